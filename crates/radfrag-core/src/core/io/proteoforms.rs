use super::error::ArtifactError;
use super::traits::ArtifactFile;
use super::{join_masses, parse_masses, tsv_reader, tsv_writer};
use crate::core::models::proteoform::Proteoform;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Debug, Serialize, Deserialize)]
struct ProteoformRow {
    accession: String,
    sequence: String,
    modification_count: usize,
    residue_masses: String,
    precursor_mass: f64,
}

/// The digested proteoform table produced by the upstream digestion step.
pub struct ProteoformFile;

impl ArtifactFile for ProteoformFile {
    type Content = Vec<Proteoform>;

    fn read_from(reader: impl Read) -> Result<Self::Content, ArtifactError> {
        let mut reader = tsv_reader(reader);
        let mut proteoforms = Vec::new();
        for (i, row) in reader.deserialize::<ProteoformRow>().enumerate() {
            let row = row?;
            let line = i as u64 + 2;
            let residue_masses = parse_masses(&row.residue_masses, line, "residue_masses")?;
            let proteoform = Proteoform::new(
                row.accession,
                row.sequence,
                row.modification_count,
                residue_masses,
                row.precursor_mass,
            )
            .map_err(|source| ArtifactError::InvalidRecord { line, source })?;
            proteoforms.push(proteoform);
        }
        Ok(proteoforms)
    }

    fn write_to(content: &Self::Content, writer: impl Write) -> Result<(), ArtifactError> {
        let mut writer = tsv_writer(writer);
        for proteoform in content {
            writer.serialize(ProteoformRow {
                accession: proteoform.accession.to_string(),
                sequence: proteoform.sequence.clone(),
                modification_count: proteoform.modification_count,
                residue_masses: join_masses(&proteoform.residue_masses),
                precursor_mass: proteoform.precursor_mass,
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "accession\tsequence\tmodification_count\tresidue_masses\tprecursor_mass\n\
                         P1\tAK\t0\t71.03711;128.09496\t217.14334\n\
                         P2\tM[Oxidation]K\t1\t147.0354;128.09496\t293.14163\n";

    #[test]
    fn reads_the_digested_table() {
        let proteoforms = ProteoformFile::read_from(TABLE.as_bytes()).unwrap();
        assert_eq!(proteoforms.len(), 2);
        assert_eq!(proteoforms[1].accession.as_str(), "P2");
        assert_eq!(proteoforms[1].modification_count, 1);
        assert_eq!(proteoforms[1].residue_masses, vec![147.0354, 128.09496]);
    }

    #[test]
    fn inconsistent_rows_name_their_line() {
        let table = "accession\tsequence\tmodification_count\tresidue_masses\tprecursor_mass\n\
                     P1\tAKR\t0\t71.03711;128.09496\t217.14334\n";
        let err = ProteoformFile::read_from(table.as_bytes()).unwrap_err();
        assert!(matches!(err, ArtifactError::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn written_tables_can_be_read_back() {
        let proteoforms = ProteoformFile::read_from(TABLE.as_bytes()).unwrap();
        let mut buffer = Vec::new();
        ProteoformFile::write_to(&proteoforms, &mut buffer).unwrap();
        assert_eq!(ProteoformFile::read_from(buffer.as_slice()).unwrap(), proteoforms);
    }
}
