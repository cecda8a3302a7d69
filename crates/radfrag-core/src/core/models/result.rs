use super::ids::AccessionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of the minimum discriminating fragment search for one target.
///
/// `fragments_needed` is `0` when no competitor shares the precursor mass,
/// `-1` when the target cannot be told apart from its competitors with the
/// fragments available, and otherwise the smallest number of fragment masses
/// that rule out every competitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscriminationResult {
    pub accession: AccessionId,
    #[serde(rename = "sequence")]
    pub sequence_key: String,
    pub competitor_count: usize,
    pub fragments_available: usize,
    pub fragments_needed: i32,
}

impl DiscriminationResult {
    pub fn is_unambiguous(&self) -> bool {
        self.fragments_needed == 0
    }

    pub fn is_indistinguishable(&self) -> bool {
        self.fragments_needed < 0
    }
}

/// Number of candidates for each count of available fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentHistogram {
    bins: BTreeMap<usize, usize>,
}

impl FragmentHistogram {
    pub fn from_counts(counts: impl IntoIterator<Item = usize>) -> Self {
        let mut histogram = Self::default();
        for count in counts {
            histogram.add(count, 1);
        }
        histogram
    }

    pub fn add(&mut self, fragment_count: usize, candidates: usize) {
        *self.bins.entry(fragment_count).or_default() += candidates;
    }

    pub fn get(&self, fragment_count: usize) -> usize {
        self.bins.get(&fragment_count).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.bins.iter().map(|(&k, &v)| (k, v))
    }

    pub fn total_candidates(&self) -> usize {
        self.bins.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

/// Tally of results by the number of fragments needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSummary {
    pub total: usize,
    pub unambiguous: usize,
    pub indistinguishable: usize,
    pub by_fragments_needed: BTreeMap<i32, usize>,
}

impl ResultSummary {
    pub fn from_results(results: &[DiscriminationResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            if result.is_unambiguous() {
                summary.unambiguous += 1;
            } else if result.is_indistinguishable() {
                summary.indistinguishable += 1;
            }
            *summary
                .by_fragments_needed
                .entry(result.fragments_needed)
                .or_default() += 1;
        }
        summary
    }
}
