use super::{FragmentationParams, FragmentationStrategy, candidate_from_boundaries};
use crate::core::models::candidate::PrecursorCandidate;
use crate::core::models::proteoform::Proteoform;

/// Radical cleavage anywhere along the backbone.
///
/// Emits every contiguous residue segment that can be released by at most
/// `max_fragmentation_events` backbone cuts. With one event this is the
/// terminal ladder; with two or more, internal fragments are included too.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackboneFragmentation;

impl FragmentationStrategy for BackboneFragmentation {
    fn name(&self) -> &str {
        "backbone"
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
        vec![candidate_from_boundaries(
            proteoform,
            &boundaries,
            params.max_fragmentation_events,
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proteoform() -> Proteoform {
        Proteoform::new("P1", "ACDE", 0, vec![1.0, 2.0, 4.0, 8.0], 15.0).unwrap()
    }

    fn params(events: usize) -> FragmentationParams {
        FragmentationParams {
            max_fragmentation_events: events,
            ..FragmentationParams::default()
        }
    }

    #[test]
    fn zero_events_yield_no_fragments() {
        let candidates = BackboneFragmentation.generate(&proteoform(), &params(0));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].fragments_available(), 0);
    }

    #[test]
    fn two_events_add_internal_segments() {
        let one = BackboneFragmentation.generate(&proteoform(), &params(1));
        let two = BackboneFragmentation.generate(&proteoform(), &params(2));
        assert_eq!(one[0].fragment_set(), &[1.0, 3.0, 7.0, 8.0, 12.0, 14.0]);
        assert_eq!(
            two[0].fragment_set(),
            &[1.0, 2.0, 3.0, 4.0, 6.0, 7.0, 8.0, 12.0, 14.0]
        );
    }

    #[test]
    fn output_is_deterministic() {
        let first = BackboneFragmentation.generate(&proteoform(), &params(2));
        let second = BackboneFragmentation.generate(&proteoform(), &params(2));
        assert_eq!(first, second);
    }
}
