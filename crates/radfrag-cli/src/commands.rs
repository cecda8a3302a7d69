pub mod explore;
pub mod index;

use crate::config::builder::build_config;
use crate::config::models::AppConfig;
use crate::cli::ExploreArgs;
use crate::error::{CliError, Result};
use radfrag::core::io::proteoforms::ProteoformFile;
use radfrag::core::io::traits::ArtifactFile;
use radfrag::core::models::proteoform::Proteoform;
use tracing::info;

/// Resolves the configuration and reads the input table shared by every
/// subcommand.
fn prepare(args: &ExploreArgs) -> Result<(AppConfig, Vec<Proteoform>)> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_config(args)?;

    info!("Loading proteoforms from {:?}", &app_config.input_path);
    let proteoforms =
        ProteoformFile::read_from_path(&app_config.input_path).map_err(|e| {
            CliError::FileParsing {
                path: app_config.input_path.clone(),
                source: e.into(),
            }
        })?;
    info!("Loaded {} proteoform(s).", proteoforms.len());
    Ok((app_config, proteoforms))
}
