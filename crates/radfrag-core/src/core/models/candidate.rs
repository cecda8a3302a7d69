use super::ids::AccessionId;
use crate::core::tolerance::MassTolerance;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Decides when two candidates are the same underlying molecule rather than
/// genuine competitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SameMoleculeRule {
    /// Same accession.
    Identity,
    /// Same full (modified) sequence.
    Sequence,
    /// Same accession or same full sequence.
    #[default]
    IdentityOrSequence,
}

impl SameMoleculeRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Sequence => "sequence",
            Self::IdentityOrSequence => "identity-or-sequence",
        }
    }
}

impl std::str::FromStr for SameMoleculeRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(Self::Identity),
            "sequence" => Ok(Self::Sequence),
            "identity-or-sequence" => Ok(Self::IdentityOrSequence),
            other => Err(format!(
                "Unknown same-molecule rule '{}'. Expected 'identity', 'sequence' or 'identity-or-sequence'.",
                other
            )),
        }
    }
}

/// One candidate molecule produced by a fragmentation strategy: the intact
/// precursor mass plus every theoretical fragment mass it can yield.
///
/// Candidates are immutable once built. The fragment masses are kept in the
/// order the strategy emitted them, alongside a sorted, de-duplicated copy that
/// serves as the set view for tolerance-aware membership tests.
#[derive(Debug, Clone)]
pub struct PrecursorCandidate {
    precursor_mass: f64,
    identity: AccessionId,
    sequence_key: String,
    fragment_masses: Vec<f64>,
    fragment_set: Vec<f64>,
    cysteine_count: Option<usize>,
}

impl PrecursorCandidate {
    pub fn new(
        identity: impl Into<AccessionId>,
        sequence_key: impl Into<String>,
        precursor_mass: f64,
        fragment_masses: Vec<f64>,
    ) -> Self {
        let mut fragment_set = fragment_masses.clone();
        fragment_set.sort_unstable_by(f64::total_cmp);
        fragment_set.dedup();
        Self {
            precursor_mass,
            identity: identity.into(),
            sequence_key: sequence_key.into(),
            fragment_masses,
            fragment_set,
            cysteine_count: None,
        }
    }

    /// Attaches the number of cysteine residues found in the sequence key.
    pub fn annotate_cysteine_count(mut self) -> Self {
        self.cysteine_count = Some(count_residue(&self.sequence_key, 'C'));
        self
    }

    pub fn precursor_mass(&self) -> f64 {
        self.precursor_mass
    }

    pub fn identity(&self) -> &AccessionId {
        &self.identity
    }

    pub fn sequence_key(&self) -> &str {
        &self.sequence_key
    }

    pub fn fragment_masses(&self) -> &[f64] {
        &self.fragment_masses
    }

    /// Sorted, de-duplicated fragment masses.
    pub fn fragment_set(&self) -> &[f64] {
        &self.fragment_set
    }

    /// Number of distinct fragment masses available for discrimination.
    pub fn fragments_available(&self) -> usize {
        self.fragment_set.len()
    }

    pub fn cysteine_count(&self) -> Option<usize> {
        self.cysteine_count
    }

    /// Returns `true` if any of this candidate's fragments is tolerance-equal to
    /// `mass`.
    pub fn contains_within(&self, mass: f64, tolerance: &MassTolerance) -> bool {
        let window = tolerance.search_window(&self.fragment_set, mass, |m| *m);
        self.fragment_set[window]
            .iter()
            .any(|&fragment| tolerance.within(mass, fragment))
    }

    pub fn is_same_molecule(&self, other: &Self, rule: SameMoleculeRule) -> bool {
        match rule {
            SameMoleculeRule::Identity => self.identity == other.identity,
            SameMoleculeRule::Sequence => self.sequence_key == other.sequence_key,
            SameMoleculeRule::IdentityOrSequence => {
                self.identity == other.identity || self.sequence_key == other.sequence_key
            }
        }
    }

    pub fn cmp_by_precursor_mass(&self, other: &Self) -> Ordering {
        self.precursor_mass.total_cmp(&other.precursor_mass)
    }
}

// Annotations are bookkeeping only and take no part in equality.
impl PartialEq for PrecursorCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
            && self.sequence_key == other.sequence_key
            && self.precursor_mass == other.precursor_mass
            && self.fragment_masses == other.fragment_masses
    }
}

/// Counts occurrences of `residue` in a sequence, ignoring anything written
/// inside modification brackets.
pub fn count_residue(sequence: &str, residue: char) -> usize {
    let mut depth = 0usize;
    let mut count = 0;
    for c in sequence.chars() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 && c == residue => count += 1,
            _ => {}
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(accession: &str, sequence: &str, fragments: Vec<f64>) -> PrecursorCandidate {
        PrecursorCandidate::new(accession, sequence, 1000.0, fragments)
    }

    #[test]
    fn fragment_set_is_sorted_and_deduplicated() {
        let c = candidate("P1", "PEPTIDE", vec![300.0, 100.0, 200.0, 100.0]);
        assert_eq!(c.fragment_masses(), &[300.0, 100.0, 200.0, 100.0]);
        assert_eq!(c.fragment_set(), &[100.0, 200.0, 300.0]);
        assert_eq!(c.fragments_available(), 3);
    }

    #[test]
    fn contains_within_respects_tolerance() {
        let c = candidate("P1", "PEPTIDE", vec![100.0, 200.0, 300.0]);
        let tolerance = MassTolerance::ppm(10.0);
        assert!(c.contains_within(200.0005, &tolerance));
        assert!(!c.contains_within(200.01, &tolerance));
        assert!(!c.contains_within(250.0, &tolerance));
    }

    #[test]
    fn same_molecule_rule_selects_the_compared_field() {
        let a = candidate("P1", "PEPTIDE", vec![]);
        let same_accession = candidate("P1", "PEPTIDEK", vec![]);
        let same_sequence = candidate("P2", "PEPTIDE", vec![]);
        let unrelated = candidate("P3", "ELVISLIVES", vec![]);

        assert!(a.is_same_molecule(&same_accession, SameMoleculeRule::Identity));
        assert!(!a.is_same_molecule(&same_sequence, SameMoleculeRule::Identity));
        assert!(a.is_same_molecule(&same_sequence, SameMoleculeRule::Sequence));
        assert!(!a.is_same_molecule(&same_accession, SameMoleculeRule::Sequence));
        assert!(a.is_same_molecule(&same_accession, SameMoleculeRule::IdentityOrSequence));
        assert!(a.is_same_molecule(&same_sequence, SameMoleculeRule::IdentityOrSequence));
        assert!(!a.is_same_molecule(&unrelated, SameMoleculeRule::IdentityOrSequence));
    }

    #[test]
    fn same_molecule_rule_parses_its_own_names() {
        for rule in [
            SameMoleculeRule::Identity,
            SameMoleculeRule::Sequence,
            SameMoleculeRule::IdentityOrSequence,
        ] {
            assert_eq!(rule.as_str().parse::<SameMoleculeRule>(), Ok(rule));
        }
        assert!("accession".parse::<SameMoleculeRule>().is_err());
    }

    #[test]
    fn annotations_do_not_affect_equality() {
        let plain = candidate("P1", "PEPCTIDEC", vec![100.0]);
        let annotated = plain.clone().annotate_cysteine_count();
        assert_eq!(annotated.cysteine_count(), Some(2));
        assert_eq!(plain, annotated);
    }

    #[test]
    fn count_residue_skips_modification_annotations() {
        assert_eq!(count_residue("AC[Carbamidomethyl]DC", 'C'), 2);
        assert_eq!(count_residue("M(Oxidation)CK", 'C'), 1);
        assert_eq!(count_residue("PEPTIDE", 'C'), 0);
    }
}
