use crate::core::fragmentation::{FragmentationParams, FragmentationStrategy};
use crate::core::models::candidate::PrecursorCandidate;
use crate::core::models::proteoform::Proteoform;
use crate::core::models::result::FragmentHistogram;
use crate::engine::config::AmbiguityLevel;
use crate::engine::progress::{Progress, ProgressReporter};
use itertools::Itertools;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Generates candidates for every proteoform and removes duplicates.
///
/// Output order follows the input order of the proteoforms, so the first
/// occurrence of a duplicate is the one kept.
#[instrument(skip_all, name = "indexing_task")]
pub fn run(
    proteoforms: &[Proteoform],
    strategy: &dyn FragmentationStrategy,
    params: &FragmentationParams,
    level: AmbiguityLevel,
    reporter: &ProgressReporter,
) -> Vec<PrecursorCandidate> {
    info!(
        proteoforms = proteoforms.len(),
        strategy = strategy.name(),
        "Generating candidates."
    );
    reporter.report(Progress::TaskStart {
        total_steps: proteoforms.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = proteoforms.iter();

    #[cfg(feature = "parallel")]
    let iterator = proteoforms.par_iter();

    let generated: Vec<Vec<PrecursorCandidate>> = iterator
        .map(|proteoform| {
            let candidates = strategy.generate(proteoform, params);
            reporter.report(Progress::TaskIncrement);
            candidates
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let total: usize = generated.iter().map(Vec::len).sum();
    let candidates = deduplicate(generated.into_iter().flatten(), level);
    info!(
        generated = total,
        kept = candidates.len(),
        "Candidate index built."
    );
    candidates
}

/// Keeps the first candidate per sequence at level one, and per accession and
/// sequence at level two.
pub fn deduplicate(
    candidates: impl IntoIterator<Item = PrecursorCandidate>,
    level: AmbiguityLevel,
) -> Vec<PrecursorCandidate> {
    let candidates = candidates.into_iter();
    match level {
        AmbiguityLevel::One => candidates
            .unique_by(|c| c.sequence_key().to_string())
            .collect(),
        AmbiguityLevel::Two => candidates
            .unique_by(|c| (c.identity().clone(), c.sequence_key().to_string()))
            .collect(),
    }
}

pub fn histogram(candidates: &[PrecursorCandidate]) -> FragmentHistogram {
    FragmentHistogram::from_counts(candidates.iter().map(PrecursorCandidate::fragments_available))
}
