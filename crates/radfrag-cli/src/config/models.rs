use radfrag::engine::config::ExplorerConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub core_config: ExplorerConfig,
}
