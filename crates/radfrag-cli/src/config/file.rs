use crate::error::{CliError, Result};
use radfrag::core::fragmentation::StrategyKind;
use radfrag::core::models::candidate::SameMoleculeRule;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileAnalysisConfig {
    pub species: Option<String>,
    pub ambiguity_level: Option<u8>,
    pub same_molecule_rule: Option<SameMoleculeRule>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileToleranceConfig {
    pub ppm: Option<f64>,
    pub missed_monoisotopics: Option<u32>,
    pub isotope_spacing: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileFragmentationConfig {
    pub strategy: Option<StrategyKind>,
    pub variable_mod_count: Option<usize>,
    pub missed_cleavages: Option<usize>,
    pub max_fragmentation_events: Option<usize>,
    pub target_residue: Option<char>,
    pub site_seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSearchConfig {
    pub max_exhaustive_pool: Option<usize>,
    pub max_combinations_per_size: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileExecutionConfig {
    pub chunk_count: Option<usize>,
    pub max_threads: Option<usize>,
    pub override_existing: Option<bool>,
    pub verify_chunks: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub analysis: Option<FileAnalysisConfig>,
    pub tolerance: Option<FileToleranceConfig>,
    pub fragmentation: Option<FileFragmentationConfig>,
    pub search: Option<FileSearchConfig>,
    pub execution: Option<FileExecutionConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| match e {
            CliError::Other(source) => CliError::FileParsing {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::Other(e.into()))
    }
}
