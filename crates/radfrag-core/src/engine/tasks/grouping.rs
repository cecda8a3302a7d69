use crate::core::models::candidate::{PrecursorCandidate, SameMoleculeRule};
use crate::core::tolerance::MassTolerance;
use crate::engine::config::AmbiguityLevel;
use std::ops::Range;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A target together with every candidate whose precursor mass it cannot be
/// told apart from.
#[derive(Debug, Clone)]
pub struct AmbiguityGroup<'a> {
    pub target: &'a PrecursorCandidate,
    pub competitors: Vec<&'a PrecursorCandidate>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupingOptions {
    pub tolerance: MassTolerance,
    pub level: AmbiguityLevel,
    pub rule: SameMoleculeRule,
}

pub fn sort_by_precursor_mass(candidates: &mut [PrecursorCandidate]) {
    candidates.sort_unstable_by(PrecursorCandidate::cmp_by_precursor_mass);
}

/// Finds an index in `sorted` whose precursor mass is tolerance-equal to
/// `mass`, or `None` if there is none.
pub fn find_within(
    sorted: &[PrecursorCandidate],
    mass: f64,
    tolerance: &MassTolerance,
) -> Option<usize> {
    tolerance
        .search_window(sorted, mass, PrecursorCandidate::precursor_mass)
        .find(|&i| tolerance.within(mass, sorted[i].precursor_mass()))
}

/// Builds the ambiguity group of the candidate at `index`.
pub fn group_target<'a>(
    sorted: &'a [PrecursorCandidate],
    index: usize,
    options: &GroupingOptions,
) -> AmbiguityGroup<'a> {
    let target = &sorted[index];
    let mass = target.precursor_mass();
    let window = options
        .tolerance
        .search_window(sorted, mass, PrecursorCandidate::precursor_mass);

    let competitors = window
        .filter(|&i| i != index)
        .map(|i| &sorted[i])
        .filter(|other| options.tolerance.within(mass, other.precursor_mass()))
        .filter(|other| match options.level {
            AmbiguityLevel::One => true,
            AmbiguityLevel::Two => !target.is_same_molecule(other, options.rule),
        })
        .collect();

    AmbiguityGroup {
        target,
        competitors,
    }
}

/// Groups the targets at the positions in `range`, comparing each against the
/// whole of `sorted`.
pub fn group_range<'a>(
    sorted: &'a [PrecursorCandidate],
    range: Range<usize>,
    options: &GroupingOptions,
) -> Vec<AmbiguityGroup<'a>> {
    range
        .map(|index| group_target(sorted, index, options))
        .collect()
}

#[instrument(skip_all, name = "grouping_task")]
pub fn group_all<'a>(
    sorted: &'a [PrecursorCandidate],
    options: &GroupingOptions,
) -> Vec<AmbiguityGroup<'a>> {
    #[cfg(not(feature = "parallel"))]
    let iterator = 0..sorted.len();

    #[cfg(feature = "parallel")]
    let iterator = (0..sorted.len()).into_par_iter();

    let groups: Vec<AmbiguityGroup<'a>> = iterator
        .map(|index| group_target(sorted, index, options))
        .collect();

    debug!(
        targets = groups.len(),
        ambiguous = groups.iter().filter(|g| !g.competitors.is_empty()).count(),
        "Grouped candidates by precursor mass."
    );
    groups
}
