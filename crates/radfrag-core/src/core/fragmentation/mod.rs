//! # Fragmentation Strategies
//!
//! A fragmentation strategy turns one digested [`Proteoform`] into the
//! [`PrecursorCandidate`]s that the explorer compares. The engine never looks
//! inside a strategy; it only relies on the contract that the same input (and
//! the same remembered cleavage choices) always yields the same candidates.
//!
//! - [`TerminalFragmentation`] - every N- and C-terminal fragment
//! - [`BackboneFragmentation`] - radical cleavage anywhere along the backbone
//! - [`ResidueSiteFragmentation`] - cleavage next to one residue type, sites
//!   chosen once per sequence

mod backbone;
mod memo;
mod residue_site;
mod terminal;

pub use backbone::BackboneFragmentation;
pub use memo::SiteMemo;
pub use residue_site::ResidueSiteFragmentation;
pub use terminal::TerminalFragmentation;

use crate::core::models::candidate::PrecursorCandidate;
use crate::core::models::proteoform::Proteoform;
use serde::{Deserialize, Serialize};

const DEFAULT_TARGET_RESIDUE: char = 'C';

/// Digestion and fragmentation options shared by all strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentationParams {
    /// Proteoforms carrying more variable modifications than this are skipped.
    pub variable_mod_count: usize,
    /// Honoured by the upstream digestion; recorded so artifacts stay keyed by it.
    pub missed_cleavages: usize,
    pub max_fragmentation_events: usize,
    pub target_residue: Option<char>,
}

impl Default for FragmentationParams {
    fn default() -> Self {
        Self {
            variable_mod_count: 0,
            missed_cleavages: 0,
            max_fragmentation_events: 1,
            target_residue: None,
        }
    }
}

impl FragmentationParams {
    pub fn accepts(&self, proteoform: &Proteoform) -> bool {
        proteoform.modification_count <= self.variable_mod_count
    }
}

pub trait FragmentationStrategy: Send + Sync {
    /// Short, file-name safe label used to key cached artifacts.
    fn name(&self) -> &str;

    fn generate(
        &self,
        proteoform: &Proteoform,
        params: &FragmentationParams,
    ) -> Vec<PrecursorCandidate>;
}

/// Selects one of the built-in strategies from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Terminal,
    #[default]
    Backbone,
    ResidueSite,
}

impl StrategyKind {
    pub fn build(
        &self,
        params: &FragmentationParams,
        seed: Option<u64>,
    ) -> Box<dyn FragmentationStrategy> {
        match self {
            Self::Terminal => Box::new(TerminalFragmentation),
            Self::Backbone => Box::new(BackboneFragmentation),
            Self::ResidueSite => {
                let residue = params.target_residue.unwrap_or(DEFAULT_TARGET_RESIDUE);
                let strategy = ResidueSiteFragmentation::new(residue);
                Box::new(match seed {
                    Some(seed) => strategy.with_seed(seed),
                    None => strategy,
                })
            }
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "terminal" => Ok(Self::Terminal),
            "backbone" => Ok(Self::Backbone),
            "residue-site" => Ok(Self::ResidueSite),
            other => Err(format!(
                "Unknown fragmentation strategy '{}'. Expected 'terminal', 'backbone' or 'residue-site'.",
                other
            )),
        }
    }
}

/// Builds a candidate whose fragments are every residue segment `start..end`
/// between two of the given cut `boundaries` (which must include `0` and the
/// sequence length), skipping the intact molecule itself.
pub(crate) fn candidate_from_boundaries(
    proteoform: &Proteoform,
    boundaries: &[usize],
    max_cuts: usize,
) -> PrecursorCandidate {
    let n = proteoform.len();
    let prefix = proteoform.prefix_masses();

    let mut fragments = Vec::new();
    for (i, &start) in boundaries.iter().enumerate() {
        for &end in &boundaries[i + 1..] {
            if start == 0 && end == n {
                continue;
            }
            let cuts = usize::from(start > 0) + usize::from(end < n);
            if cuts <= max_cuts {
                fragments.push(prefix[end] - prefix[start]);
            }
        }
    }

    PrecursorCandidate::new(
        proteoform.accession.clone(),
        proteoform.sequence.clone(),
        proteoform.precursor_mass,
        fragments,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proteoform() -> Proteoform {
        Proteoform::new("P1", "ACDE", 0, vec![1.0, 2.0, 4.0, 8.0], 15.0).unwrap()
    }

    #[test]
    fn boundaries_produce_segments_between_cut_points() {
        let candidate = candidate_from_boundaries(&proteoform(), &[0, 2, 4], 2);
        assert_eq!(candidate.fragment_masses(), &[3.0, 12.0]);
    }

    #[test]
    fn cut_limit_removes_internal_segments() {
        let boundaries = [0, 1, 2, 3, 4];
        let one_cut = candidate_from_boundaries(&proteoform(), &boundaries, 1);
        let two_cuts = candidate_from_boundaries(&proteoform(), &boundaries, 2);
        assert_eq!(one_cut.fragments_available(), 6);
        assert_eq!(two_cuts.fragments_available(), 9);
    }

    #[test]
    fn params_reject_overly_modified_proteoforms() {
        let params = FragmentationParams {
            variable_mod_count: 1,
            ..FragmentationParams::default()
        };
        let modified = Proteoform::new("P2", "AC", 2, vec![1.0, 2.0], 3.0).unwrap();
        assert!(params.accepts(&proteoform()));
        assert!(!params.accepts(&modified));
    }

    #[test]
    fn strategy_kind_parses_and_builds() {
        let params = FragmentationParams {
            target_residue: Some('W'),
            ..FragmentationParams::default()
        };
        let kind: StrategyKind = "residue-site".parse().unwrap();
        assert_eq!(kind.build(&params, Some(1)).name(), "residue-site-W");
        assert_eq!(StrategyKind::Terminal.build(&params, None).name(), "terminal");
        assert!("nonsense".parse::<StrategyKind>().is_err());
    }
}
