use super::error::ArtifactError;
use super::traits::ArtifactFile;
use super::{join_masses, parse_masses, tsv_reader, tsv_writer};
use crate::core::models::candidate::PrecursorCandidate;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Debug, Serialize, Deserialize)]
struct IndexRow {
    precursor_mass: f64,
    accession: String,
    sequence: String,
    fragment_masses: String,
}

/// The candidate index: one row per precursor candidate with its fragment
/// masses in generation order.
pub struct IndexFile;

impl ArtifactFile for IndexFile {
    type Content = Vec<PrecursorCandidate>;

    fn read_from(reader: impl Read) -> Result<Self::Content, ArtifactError> {
        let mut reader = tsv_reader(reader);
        let mut candidates = Vec::new();
        for (i, row) in reader.deserialize::<IndexRow>().enumerate() {
            let row = row?;
            let line = i as u64 + 2;
            let fragments = parse_masses(&row.fragment_masses, line, "fragment_masses")?;
            candidates.push(PrecursorCandidate::new(
                row.accession,
                row.sequence,
                row.precursor_mass,
                fragments,
            ));
        }
        Ok(candidates)
    }

    fn write_to(content: &Self::Content, writer: impl Write) -> Result<(), ArtifactError> {
        let mut writer = tsv_writer(writer);
        for candidate in content {
            writer.serialize(IndexRow {
                precursor_mass: candidate.precursor_mass(),
                accession: candidate.identity().to_string(),
                sequence: candidate.sequence_key().to_string(),
                fragment_masses: join_masses(candidate.fragment_masses()),
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}
