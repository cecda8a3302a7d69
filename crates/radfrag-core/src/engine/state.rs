use crate::core::models::candidate::PrecursorCandidate;
use crate::core::models::result::{DiscriminationResult, FragmentHistogram};
use std::fmt;

/// Stages an explorer run moves through. Later stages imply the earlier ones
/// are complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ExplorerStage {
    #[default]
    Uninitialized,
    Indexed,
    Searched,
    Merged,
}

impl fmt::Display for ExplorerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Indexed => "indexed",
            Self::Searched => "searched",
            Self::Merged => "merged",
        };
        f.write_str(name)
    }
}

/// Everything an explorer has produced so far.
#[derive(Debug, Default)]
pub struct ExplorerState {
    stage: ExplorerStage,
    candidates: Vec<PrecursorCandidate>,
    histogram: FragmentHistogram,
    results: Vec<DiscriminationResult>,
}

impl ExplorerState {
    pub fn stage(&self) -> ExplorerStage {
        self.stage
    }

    pub fn has_reached(&self, stage: ExplorerStage) -> bool {
        self.stage >= stage
    }

    pub fn candidates(&self) -> &[PrecursorCandidate] {
        &self.candidates
    }

    pub fn histogram(&self) -> &FragmentHistogram {
        &self.histogram
    }

    pub fn results(&self) -> &[DiscriminationResult] {
        &self.results
    }

    pub(crate) fn candidates_mut(&mut self) -> &mut Vec<PrecursorCandidate> {
        &mut self.candidates
    }

    pub(crate) fn mark_indexed(
        &mut self,
        candidates: Vec<PrecursorCandidate>,
        histogram: FragmentHistogram,
    ) {
        self.candidates = candidates;
        self.histogram = histogram;
        self.results.clear();
        self.stage = ExplorerStage::Indexed;
    }

    pub(crate) fn mark_searched(&mut self) {
        self.stage = self.stage.max(ExplorerStage::Searched);
    }

    pub(crate) fn mark_merged(&mut self, results: Vec<DiscriminationResult>) {
        self.results = results;
        self.stage = ExplorerStage::Merged;
    }

    pub(crate) fn into_results(self) -> Vec<DiscriminationResult> {
        self.results
    }
}
