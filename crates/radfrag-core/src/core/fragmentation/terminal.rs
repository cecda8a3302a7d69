use super::{FragmentationParams, FragmentationStrategy, candidate_from_boundaries};
use crate::core::models::candidate::PrecursorCandidate;
use crate::core::models::proteoform::Proteoform;

/// Every N-terminal and C-terminal fragment of the sequence, i.e. the pieces
/// left by a single backbone cut at any position.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalFragmentation;

impl FragmentationStrategy for TerminalFragmentation {
    fn name(&self) -> &str {
        "terminal"
    }

    fn generate(
        &self,
        proteoform: &Proteoform,
        params: &FragmentationParams,
    ) -> Vec<PrecursorCandidate> {
        if !params.accepts(proteoform) {
            return Vec::new();
        }
        let boundaries: Vec<usize> = (0..=proteoform.len()).collect();
        vec![candidate_from_boundaries(proteoform, &boundaries, 1)]
    }
}
