use crate::core::fragmentation::{FragmentationParams, StrategyKind};
use crate::core::models::candidate::SameMoleculeRule;
use crate::core::tolerance::MassTolerance;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// How strictly two candidates must differ before they count as competitors.
///
/// At level one every other candidate in the precursor window competes. At
/// level two, candidates that are the same molecule as the target (see
/// [`SameMoleculeRule`]) are left out, and the index is de-duplicated per
/// accession instead of per sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AmbiguityLevel {
    #[default]
    One,
    Two,
}

impl AmbiguityLevel {
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl TryFrom<u8> for AmbiguityLevel {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(ConfigError::InvalidParameter {
                name: "ambiguity_level",
                reason: format!("expected 1 or 2, got {}", other),
            }),
        }
    }
}

impl From<AmbiguityLevel> for u8 {
    fn from(level: AmbiguityLevel) -> Self {
        level.as_u8()
    }
}

/// Bounds on the exhaustive combination search. Beyond them the search
/// switches to a greedy cover, which yields an upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    pub max_exhaustive_pool: usize,
    pub max_combinations_per_size: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_exhaustive_pool: 24,
            max_combinations_per_size: 100_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub species: String,
    pub ambiguity_level: AmbiguityLevel,
    pub same_molecule_rule: SameMoleculeRule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentationConfig {
    pub strategy: StrategyKind,
    pub params: FragmentationParams,
    pub site_seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    pub output_dir: PathBuf,
    pub chunk_count: usize,
    pub max_threads: Option<usize>,
    pub override_existing: bool,
    pub verify_chunks: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    pub analysis: AnalysisConfig,
    pub tolerance: MassTolerance,
    pub fragmentation: FragmentationConfig,
    pub search: SearchLimits,
    pub execution: ExecutionConfig,
}

impl ExplorerConfig {
    /// Identifies the candidate index produced by this configuration.
    pub fn index_key(&self, strategy_name: &str) -> String {
        let params = &self.fragmentation.params;
        let mut key = format!(
            "{}_{}_mods{}_mc{}_ev{}_amb{}",
            self.analysis.species,
            strategy_name,
            params.variable_mod_count,
            params.missed_cleavages,
            params.max_fragmentation_events,
            self.analysis.ambiguity_level.as_u8(),
        );
        if let Some(seed) = self.fragmentation.site_seed {
            key.push_str(&format!("_seed{}", seed));
        }
        key
    }

    /// Identifies the results of a search over the index, extending
    /// [`index_key`](Self::index_key) with everything that changes grouping
    /// or the search outcome.
    pub fn result_key(&self, strategy_name: &str) -> String {
        format!(
            "{}_ppm{}_mm{}_{}_pool{}_comb{}",
            self.index_key(strategy_name),
            self.tolerance.ppm_value(),
            self.tolerance.missed_monoisotopics(),
            self.analysis.same_molecule_rule.as_str(),
            self.search.max_exhaustive_pool,
            self.search.max_combinations_per_size,
        )
    }

    pub fn artifact_paths(&self, strategy_name: &str) -> ArtifactPaths {
        ArtifactPaths::new(
            &self.execution.output_dir,
            &self.index_key(strategy_name),
            &self.result_key(strategy_name),
        )
    }
}

/// Locations of every artifact a run reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub index: PathBuf,
    pub histogram: PathBuf,
    pub results: PathBuf,
    chunk_stem: PathBuf,
}

impl ArtifactPaths {
    pub fn new(output_dir: &Path, index_key: &str, result_key: &str) -> Self {
        Self {
            index: output_dir.join(format!("{}_index.tsv", index_key)),
            histogram: output_dir.join(format!("{}_histogram.tsv", index_key)),
            results: output_dir.join(format!("{}_results.tsv", result_key)),
            chunk_stem: output_dir.join(result_key),
        }
    }

    /// File holding chunk `index` of a search split into `count` chunks.
    /// The count is part of the name so a run with a different split never
    /// picks up chunks covering other ranges.
    pub fn chunk(&self, index: usize, count: usize) -> PathBuf {
        let mut name = self.chunk_stem.as_os_str().to_os_string();
        name.push(format!("_chunk{}of{}.tsv", index, count));
        PathBuf::from(name)
    }
}

#[derive(Default)]
pub struct ExplorerConfigBuilder {
    species: Option<String>,
    ambiguity_level: Option<AmbiguityLevel>,
    same_molecule_rule: Option<SameMoleculeRule>,
    tolerance: Option<MassTolerance>,
    strategy: Option<StrategyKind>,
    params: Option<FragmentationParams>,
    site_seed: Option<u64>,
    search: Option<SearchLimits>,
    output_dir: Option<PathBuf>,
    chunk_count: Option<usize>,
    max_threads: Option<usize>,
    override_existing: bool,
    verify_chunks: bool,
}

impl ExplorerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }
    pub fn ambiguity_level(mut self, level: AmbiguityLevel) -> Self {
        self.ambiguity_level = Some(level);
        self
    }
    pub fn same_molecule_rule(mut self, rule: SameMoleculeRule) -> Self {
        self.same_molecule_rule = Some(rule);
        self
    }
    pub fn tolerance(mut self, tolerance: MassTolerance) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = Some(strategy);
        self
    }
    pub fn fragmentation_params(mut self, params: FragmentationParams) -> Self {
        self.params = Some(params);
        self
    }
    pub fn site_seed(mut self, seed: Option<u64>) -> Self {
        self.site_seed = seed;
        self
    }
    pub fn search_limits(mut self, limits: SearchLimits) -> Self {
        self.search = Some(limits);
        self
    }
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
    pub fn chunk_count(mut self, count: usize) -> Self {
        self.chunk_count = Some(count);
        self
    }
    pub fn max_threads(mut self, threads: Option<usize>) -> Self {
        self.max_threads = threads;
        self
    }
    pub fn override_existing(mut self, enabled: bool) -> Self {
        self.override_existing = enabled;
        self
    }
    pub fn verify_chunks(mut self, enabled: bool) -> Self {
        self.verify_chunks = enabled;
        self
    }

    pub fn build(self) -> Result<ExplorerConfig, ConfigError> {
        let species = self
            .species
            .ok_or(ConfigError::MissingParameter("species"))?;
        if species.is_empty() || species.contains(['/', '\\']) {
            return Err(ConfigError::InvalidParameter {
                name: "species",
                reason: format!("'{}' cannot be used in a file name", species),
            });
        }

        let tolerance = self
            .tolerance
            .ok_or(ConfigError::MissingParameter("tolerance"))?;
        if !tolerance.ppm_value().is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "tolerance",
                reason: "ppm must be a finite number".to_string(),
            });
        }

        let chunk_count = self
            .chunk_count
            .ok_or(ConfigError::MissingParameter("chunk_count"))?;
        if chunk_count == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "chunk_count",
                reason: "at least one chunk is required".to_string(),
            });
        }
        if self.max_threads == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_threads",
                reason: "at least one thread is required".to_string(),
            });
        }

        let analysis = AnalysisConfig {
            species,
            ambiguity_level: self
                .ambiguity_level
                .ok_or(ConfigError::MissingParameter("ambiguity_level"))?,
            same_molecule_rule: self.same_molecule_rule.unwrap_or_default(),
        };
        let fragmentation = FragmentationConfig {
            strategy: self
                .strategy
                .ok_or(ConfigError::MissingParameter("strategy"))?,
            params: self
                .params
                .ok_or(ConfigError::MissingParameter("fragmentation_params"))?,
            site_seed: self.site_seed,
        };
        let execution = ExecutionConfig {
            output_dir: self
                .output_dir
                .ok_or(ConfigError::MissingParameter("output_dir"))?,
            chunk_count,
            max_threads: self.max_threads,
            override_existing: self.override_existing,
            verify_chunks: self.verify_chunks,
        };

        Ok(ExplorerConfig {
            analysis,
            tolerance,
            fragmentation,
            search: self.search.unwrap_or_default(),
            execution,
        })
    }
}
