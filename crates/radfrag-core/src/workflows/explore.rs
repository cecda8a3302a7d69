use crate::core::fragmentation::FragmentationStrategy;
use crate::core::io::histogram::HistogramFile;
use crate::core::io::index::IndexFile;
use crate::core::io::results::ResultsFile;
use crate::core::io::traits::ArtifactFile;
use crate::core::models::candidate::PrecursorCandidate;
use crate::core::models::proteoform::Proteoform;
use crate::core::models::result::{DiscriminationResult, FragmentHistogram, ResultSummary};
use crate::engine::config::{ArtifactPaths, ExplorerConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{ExplorerStage, ExplorerState};
use crate::engine::tasks::chunking::{self, ChunkOptions};
use crate::engine::tasks::grouping::{GroupingOptions, sort_by_precursor_mass};
use crate::engine::tasks::indexing;
use std::fs;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct IndexResult {
    pub candidate_count: usize,
    pub histogram: FragmentHistogram,
    pub paths: ArtifactPaths,
}

#[derive(Debug, Clone)]
pub struct ExploreResult {
    pub results: Vec<DiscriminationResult>,
    pub summary: ResultSummary,
    pub paths: ArtifactPaths,
}

/// Drives one analysis configuration through indexing, chunked search and
/// merging.
///
/// Every stage first looks for the artifact it would produce and, unless
/// `override_existing` is set, loads it instead of recomputing. Running a
/// stage twice is therefore harmless, and an interrupted run picks up where it
/// stopped.
pub struct Explorer<'a> {
    config: ExplorerConfig,
    strategy: Box<dyn FragmentationStrategy>,
    paths: ArtifactPaths,
    reporter: &'a ProgressReporter<'a>,
    state: ExplorerState,
}

impl<'a> Explorer<'a> {
    /// Creates an explorer using the strategy selected in `config`.
    pub fn new(config: ExplorerConfig, reporter: &'a ProgressReporter<'a>) -> Self {
        let strategy = config
            .fragmentation
            .strategy
            .build(&config.fragmentation.params, config.fragmentation.site_seed);
        Self::with_strategy(config, strategy, reporter)
    }

    /// Creates an explorer around a caller-supplied strategy.
    pub fn with_strategy(
        config: ExplorerConfig,
        strategy: Box<dyn FragmentationStrategy>,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        let paths = config.artifact_paths(strategy.name());
        Self {
            config,
            strategy,
            paths,
            reporter,
            state: ExplorerState::default(),
        }
    }

    pub fn stage(&self) -> ExplorerStage {
        self.state.stage()
    }

    pub fn state(&self) -> &ExplorerState {
        &self.state
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Loads the candidate index, or generates and stores it.
    #[instrument(skip_all, name = "index_stage")]
    pub fn build_index(&mut self, proteoforms: &[Proteoform]) -> Result<(), EngineError> {
        if self.state.has_reached(ExplorerStage::Indexed) {
            return Ok(());
        }
        self.ensure_output_dir()?;
        let reporter = self.reporter;
        reporter.phase("Building Index", || -> Result<(), EngineError> {
            let candidates = match self.load_existing_index() {
                Some(candidates) => candidates,
                None => {
                    let candidates = indexing::run(
                        proteoforms,
                        self.strategy.as_ref(),
                        &self.config.fragmentation.params,
                        self.config.analysis.ambiguity_level,
                        reporter,
                    );
                    IndexFile::write_to_path_atomic(&candidates, &self.paths.index)
                        .map_err(|source| EngineError::artifact(&self.paths.index, source))?;
                    candidates
                }
            };

            let histogram = indexing::histogram(&candidates);
            if self.config.execution.override_existing || !self.paths.histogram.exists() {
                HistogramFile::write_to_path_atomic(&histogram, &self.paths.histogram)
                    .map_err(|source| EngineError::artifact(&self.paths.histogram, source))?;
            }

            info!(
                candidates = candidates.len(),
                path = %self.paths.index.display(),
                "Index ready."
            );
            self.state.mark_indexed(candidates, histogram);
            Ok(())
        })
    }

    /// Groups and searches the index chunk by chunk.
    #[instrument(skip_all, name = "search_stage")]
    pub fn search(&mut self) -> Result<(), EngineError> {
        if self.state.has_reached(ExplorerStage::Searched) {
            return Ok(());
        }
        if !self.state.has_reached(ExplorerStage::Indexed) {
            return Err(EngineError::Internal(
                "search requested before the index was built".to_string(),
            ));
        }

        let options = ChunkOptions {
            grouping: GroupingOptions {
                tolerance: self.config.tolerance,
                level: self.config.analysis.ambiguity_level,
                rule: self.config.analysis.same_molecule_rule,
            },
            limits: self.config.search,
            override_existing: self.config.execution.override_existing,
            verify_chunks: self.config.execution.verify_chunks,
        };

        let reporter = self.reporter;
        reporter.phase("Searching", || {
            sort_by_precursor_mass(self.state.candidates_mut());
            chunking::run(
                self.state.candidates(),
                self.config.execution.chunk_count,
                &self.paths,
                &options,
                reporter,
            )
        })?;
        self.state.mark_searched();
        Ok(())
    }

    /// Combines the chunk files into the result artifact.
    #[instrument(skip_all, name = "merge_stage")]
    pub fn merge(&mut self) -> Result<(), EngineError> {
        if self.state.has_reached(ExplorerStage::Merged) {
            return Ok(());
        }
        if !self.state.has_reached(ExplorerStage::Searched) {
            return Err(EngineError::Internal(
                "merge requested before the search finished".to_string(),
            ));
        }
        let results = self.reporter.phase("Merging", || {
            chunking::merge(&self.paths, self.config.execution.chunk_count)
        })?;
        self.state.mark_merged(results);
        Ok(())
    }

    /// Runs every remaining stage. An existing result artifact short-cuts the
    /// whole pipeline.
    pub fn run(&mut self, proteoforms: &[Proteoform]) -> Result<(), EngineError> {
        if !self.state.has_reached(ExplorerStage::Merged) {
            if let Some(results) = self.load_existing_results() {
                self.state.mark_merged(results);
                return Ok(());
            }
        }
        self.build_index(proteoforms)?;
        self.search()?;
        self.merge()
    }

    pub fn into_results(self) -> Vec<DiscriminationResult> {
        self.state.into_results()
    }

    fn ensure_output_dir(&self) -> Result<(), EngineError> {
        let dir = &self.config.execution.output_dir;
        fs::create_dir_all(dir).map_err(|source| EngineError::io(dir, source))
    }

    fn load_existing_index(&self) -> Option<Vec<PrecursorCandidate>> {
        if self.config.execution.override_existing || !self.paths.index.exists() {
            return None;
        }
        match IndexFile::read_from_path(&self.paths.index) {
            Ok(candidates) => {
                info!(path = %self.paths.index.display(), "Loaded existing index.");
                self.reporter.report(Progress::Message(format!(
                    "Reusing index {}",
                    self.paths.index.display()
                )));
                Some(candidates)
            }
            Err(err) => {
                warn!(
                    path = %self.paths.index.display(),
                    error = %err,
                    "Existing index is unreadable, regenerating."
                );
                None
            }
        }
    }

    fn load_existing_results(&self) -> Option<Vec<DiscriminationResult>> {
        if self.config.execution.override_existing || !self.paths.results.exists() {
            return None;
        }
        match ResultsFile::read_from_path(&self.paths.results) {
            Ok(results) => {
                info!(path = %self.paths.results.display(), "Loaded existing results.");
                self.reporter.report(Progress::Message(format!(
                    "Reusing results {}",
                    self.paths.results.display()
                )));
                Some(results)
            }
            Err(err) => {
                warn!(
                    path = %self.paths.results.display(),
                    error = %err,
                    "Existing results are unreadable, recomputing."
                );
                None
            }
        }
    }
}

/// Runs `body` on a dedicated pool when `max_threads` is set, otherwise on
/// the global one.
fn with_thread_pool<T>(
    max_threads: Option<usize>,
    body: impl FnOnce() -> Result<T, EngineError> + Send,
) -> Result<T, EngineError>
where
    T: Send,
{
    #[cfg(feature = "parallel")]
    if let Some(threads) = max_threads {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;
        return pool.install(body);
    }

    #[cfg(not(feature = "parallel"))]
    let _ = max_threads;

    body()
}

/// Full run: index, search, merge. Returns the merged results with a summary.
#[instrument(skip_all, name = "explore_workflow")]
pub fn run(
    proteoforms: &[Proteoform],
    config: &ExplorerConfig,
    reporter: &ProgressReporter,
) -> Result<ExploreResult, EngineError> {
    info!(species = %config.analysis.species, "Starting exploration.");
    with_thread_pool(config.execution.max_threads, || {
        let mut explorer = Explorer::new(config.clone(), reporter);
        explorer.run(proteoforms)?;
        let paths = explorer.paths().clone();
        let results = explorer.into_results();
        let summary = ResultSummary::from_results(&results);
        info!(
            total = summary.total,
            unambiguous = summary.unambiguous,
            indistinguishable = summary.indistinguishable,
            "Exploration complete."
        );
        Ok(ExploreResult {
            results,
            summary,
            paths,
        })
    })
}

/// Builds (or loads) the candidate index and its histogram only.
#[instrument(skip_all, name = "index_workflow")]
pub fn index(
    proteoforms: &[Proteoform],
    config: &ExplorerConfig,
    reporter: &ProgressReporter,
) -> Result<IndexResult, EngineError> {
    with_thread_pool(config.execution.max_threads, || {
        let mut explorer = Explorer::new(config.clone(), reporter);
        explorer.build_index(proteoforms)?;
        Ok(IndexResult {
            candidate_count: explorer.state().candidates().len(),
            histogram: explorer.state().histogram().clone(),
            paths: explorer.paths().clone(),
        })
    })
}
