use super::discrimination::discriminate;
use super::grouping::{GroupingOptions, group_range};
use crate::core::io::results::ResultsFile;
use crate::core::io::traits::ArtifactFile;
use crate::core::models::candidate::PrecursorCandidate;
use crate::core::models::result::DiscriminationResult;
use crate::engine::config::{ArtifactPaths, SearchLimits};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::fs;
use std::io::ErrorKind;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkOptions {
    pub grouping: GroupingOptions,
    pub limits: SearchLimits,
    pub override_existing: bool,
    pub verify_chunks: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOutcome {
    Computed,
    Reused,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkSummary {
    pub computed: usize,
    pub reused: usize,
}

/// Splits `0..len` into `chunk_count` contiguous, disjoint ranges whose
/// lengths differ by at most one. Trailing ranges are empty when there are
/// more chunks than items.
pub fn chunk_ranges(len: usize, chunk_count: usize) -> Vec<Range<usize>> {
    let chunk_count = chunk_count.max(1);
    let base = len / chunk_count;
    let extra = len % chunk_count;
    let mut start = 0;
    (0..chunk_count)
        .map(|i| {
            let size = base + usize::from(i < extra);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// Groups and searches every chunk of `sorted`, writing one result file per
/// chunk. Chunks whose file is already present are reused.
#[instrument(skip_all, name = "chunked_search_task")]
pub fn run(
    sorted: &[PrecursorCandidate],
    chunk_count: usize,
    paths: &ArtifactPaths,
    options: &ChunkOptions,
    reporter: &ProgressReporter,
) -> Result<ChunkSummary, EngineError> {
    let ranges = chunk_ranges(sorted.len(), chunk_count);
    info!(
        candidates = sorted.len(),
        chunks = ranges.len(),
        "Searching for discriminating fragments."
    );
    reporter.report(Progress::TaskStart {
        total_steps: ranges.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = ranges.iter().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = ranges.par_iter().enumerate();

    let outcomes = iterator
        .map(|(index, range)| {
            let path = paths.chunk(index, chunk_count);
            let outcome = process_chunk(sorted, index, range.clone(), &path, options);
            reporter.report(Progress::TaskIncrement);
            outcome
        })
        .collect::<Result<Vec<_>, _>>()?;

    reporter.report(Progress::TaskFinish);

    let summary = outcomes
        .iter()
        .fold(ChunkSummary::default(), |mut summary, outcome| {
            match outcome {
                ChunkOutcome::Computed => summary.computed += 1,
                ChunkOutcome::Reused => summary.reused += 1,
            }
            summary
        });
    info!(
        computed = summary.computed,
        reused = summary.reused,
        "Chunked search complete."
    );
    Ok(summary)
}

fn process_chunk(
    sorted: &[PrecursorCandidate],
    index: usize,
    range: Range<usize>,
    path: &Path,
    options: &ChunkOptions,
) -> Result<ChunkOutcome, EngineError> {
    if !options.override_existing && path.exists() {
        if !options.verify_chunks {
            debug!(chunk = index, "Reusing existing chunk file.");
            return Ok(ChunkOutcome::Reused);
        }
        match ResultsFile::count_records_path(path) {
            Ok(count) if count == range.len() => {
                debug!(chunk = index, records = count, "Verified existing chunk file.");
                return Ok(ChunkOutcome::Reused);
            }
            Ok(count) => warn!(
                chunk = index,
                records = count,
                expected = range.len(),
                "Chunk file is incomplete, recomputing."
            ),
            Err(err) => warn!(chunk = index, error = %err, "Chunk file is unreadable, recomputing."),
        }
    }

    let results = search_range(sorted, range, options);
    ResultsFile::write_to_path_atomic(&results, path)
        .map_err(|source| EngineError::artifact(path, source))?;
    Ok(ChunkOutcome::Computed)
}

/// Groups and searches the targets at `range` without touching the disk.
pub fn search_range(
    sorted: &[PrecursorCandidate],
    range: Range<usize>,
    options: &ChunkOptions,
) -> Vec<DiscriminationResult> {
    group_range(sorted, range, &options.grouping)
        .iter()
        .map(|group| discriminate(group, &options.grouping.tolerance, &options.limits))
        .collect()
}

/// Concatenates the chunk files in order into the result artifact, then
/// deletes them.
#[instrument(skip_all, name = "merge_task")]
pub fn merge(
    paths: &ArtifactPaths,
    chunk_count: usize,
) -> Result<Vec<DiscriminationResult>, EngineError> {
    let mut results = Vec::new();
    for index in 0..chunk_count {
        let path = paths.chunk(index, chunk_count);
        let mut chunk =
            ResultsFile::read_from_path(&path).map_err(|source| EngineError::artifact(&path, source))?;
        results.append(&mut chunk);
    }

    ResultsFile::write_to_path_atomic(&results, &paths.results)
        .map_err(|source| EngineError::artifact(&paths.results, source))?;

    for index in 0..chunk_count {
        let path = paths.chunk(index, chunk_count);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(EngineError::io(path, err)),
        }
    }

    info!(
        records = results.len(),
        path = %paths.results.display(),
        "Merged chunk results."
    );
    Ok(results)
}
