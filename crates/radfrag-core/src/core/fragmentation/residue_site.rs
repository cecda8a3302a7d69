use super::{FragmentationParams, FragmentationStrategy, SiteMemo, candidate_from_boundaries};
use crate::core::models::candidate::PrecursorCandidate;
use crate::core::models::proteoform::Proteoform;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::trace;

/// Radical cleavage directed at one residue type.
///
/// Every occurrence of the target residue (other than at the N-terminus) is a
/// potential cut immediately before it. For each distinct sequence,
/// `max_fragmentation_events` of those sites are picked at random once and
/// remembered, so repeated sequences always fragment identically. Fragments
/// are the segments between any two of the chosen cuts and the termini.
#[derive(Debug)]
pub struct ResidueSiteFragmentation {
    residue: char,
    name: String,
    seed: Option<u64>,
    memo: SiteMemo,
}

impl ResidueSiteFragmentation {
    pub fn new(residue: char) -> Self {
        Self {
            residue,
            name: format!("residue-site-{}", residue),
            seed: None,
            memo: SiteMemo::new(),
        }
    }

    /// Makes site selection reproducible: the same seed and sequence always
    /// pick the same sites, regardless of processing order.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn candidate_sites(&self, proteoform: &Proteoform) -> Vec<usize> {
        proteoform
            .residues()
            .enumerate()
            .filter(|&(i, residue)| i > 0 && residue == self.residue)
            .map(|(i, _)| i)
            .collect()
    }

    fn choose_sites(&self, proteoform: &Proteoform, count: usize) -> Vec<usize> {
        let available = self.candidate_sites(proteoform);
        let amount = count.min(available.len());
        let picked = match self.seed {
            Some(seed) => {
                let mut hasher = DefaultHasher::new();
                proteoform.sequence.hash(&mut hasher);
                let mut rng = StdRng::seed_from_u64(seed ^ hasher.finish());
                sample(&mut rng, available.len(), amount)
            }
            None => sample(&mut rand::thread_rng(), available.len(), amount),
        };
        let mut sites: Vec<usize> = picked.into_iter().map(|i| available[i]).collect();
        sites.sort_unstable();
        trace!(sequence = %proteoform.sequence, ?sites, "Chose cleavage sites");
        sites
    }
}

impl FragmentationStrategy for ResidueSiteFragmentation {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(
        &self,
        proteoform: &Proteoform,
        params: &FragmentationParams,
    ) -> Vec<PrecursorCandidate> {
        if !params.accepts(proteoform) {
            return Vec::new();
        }
        let sites = self.memo.get_or_choose(&proteoform.sequence, || {
            self.choose_sites(proteoform, params.max_fragmentation_events)
        });

        let mut boundaries = Vec::with_capacity(sites.len() + 2);
        boundaries.push(0);
        boundaries.extend(sites.iter().copied());
        boundaries.push(proteoform.len());

        vec![candidate_from_boundaries(proteoform, &boundaries, sites.len()).annotate_cysteine_count()]
    }
}
