use super::ids::AccessionId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ProteoformError {
    #[error("Proteoform '{accession}' has {residues} residues but {masses} residue masses")]
    ResidueMassMismatch {
        accession: String,
        residues: usize,
        masses: usize,
    },
    #[error("Proteoform '{0}' has an empty sequence")]
    EmptySequence(String),
}

/// A digested protein or proteoform as delivered by the external digestion
/// step.
///
/// Residue masses are computed upstream (including any modification deltas)
/// and listed in sequence order, one per residue. Fragmentation strategies
/// only ever sum contiguous runs of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Proteoform {
    pub accession: AccessionId,
    /// Full sequence, possibly with inline modification annotations.
    pub sequence: String,
    pub modification_count: usize,
    pub residue_masses: Vec<f64>,
    pub precursor_mass: f64,
}

impl Proteoform {
    pub fn new(
        accession: impl Into<AccessionId>,
        sequence: impl Into<String>,
        modification_count: usize,
        residue_masses: Vec<f64>,
        precursor_mass: f64,
    ) -> Result<Self, ProteoformError> {
        let accession = accession.into();
        let sequence = sequence.into();
        let residues = base_residues(&sequence).count();
        if residues == 0 {
            return Err(ProteoformError::EmptySequence(accession.to_string()));
        }
        if residues != residue_masses.len() {
            return Err(ProteoformError::ResidueMassMismatch {
                accession: accession.to_string(),
                residues,
                masses: residue_masses.len(),
            });
        }
        Ok(Self {
            accession,
            sequence,
            modification_count,
            residue_masses,
            precursor_mass,
        })
    }

    pub fn len(&self) -> usize {
        self.residue_masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residue_masses.is_empty()
    }

    /// Unmodified residue letters in sequence order.
    pub fn residues(&self) -> impl Iterator<Item = char> + '_ {
        base_residues(&self.sequence)
    }

    /// Running totals of the residue masses, starting at zero, so the mass
    /// of the segment `start..end` is `prefix[end] - prefix[start]`.
    pub fn prefix_masses(&self) -> Vec<f64> {
        let mut prefix = Vec::with_capacity(self.residue_masses.len() + 1);
        prefix.push(0.0);
        let mut total = 0.0;
        for mass in &self.residue_masses {
            total += mass;
            prefix.push(total);
        }
        prefix
    }
}

fn base_residues(sequence: &str) -> impl Iterator<Item = char> + '_ {
    let mut depth = 0usize;
    sequence.chars().filter(move |&c| match c {
        '[' | '(' => {
            depth += 1;
            false
        }
        ']' | ')' => {
            depth = depth.saturating_sub(1);
            false
        }
        _ => depth == 0 && c.is_ascii_alphabetic(),
    })
}
