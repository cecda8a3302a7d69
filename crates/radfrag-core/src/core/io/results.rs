use super::error::ArtifactError;
use super::traits::ArtifactFile;
use super::{tsv_reader, tsv_writer};
use crate::core::models::result::DiscriminationResult;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Discrimination results, used for both the merged result artifact and the
/// per-chunk files.
pub struct ResultsFile;

impl ResultsFile {
    /// Counts the records in a results file without materialising them.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not valid TSV.
    pub fn count_records_path<P: AsRef<Path>>(path: P) -> Result<usize, ArtifactError> {
        let file = File::open(path)?;
        let mut reader = tsv_reader(BufReader::new(file));
        let mut record = csv::StringRecord::new();
        let mut count = 0;
        while reader.read_record(&mut record)? {
            count += 1;
        }
        Ok(count)
    }
}

impl ArtifactFile for ResultsFile {
    type Content = Vec<DiscriminationResult>;

    fn read_from(reader: impl Read) -> Result<Self::Content, ArtifactError> {
        let mut reader = tsv_reader(reader);
        let results = reader
            .deserialize::<DiscriminationResult>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(results)
    }

    fn write_to(content: &Self::Content, writer: impl Write) -> Result<(), ArtifactError> {
        let mut writer = tsv_writer(writer);
        for result in content {
            writer.serialize(result)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn result(accession: &str, needed: i32) -> DiscriminationResult {
        DiscriminationResult {
            accession: accession.into(),
            sequence_key: format!("{}SEQ", accession),
            competitor_count: 2,
            fragments_available: 10,
            fragments_needed: needed,
        }
    }

    #[test]
    fn results_round_trip_and_can_be_counted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run_results.tsv");
        let results = vec![result("P1", 1), result("P2", -1), result("P3", 0)];

        ResultsFile::write_to_path(&results, &path).unwrap();

        assert_eq!(ResultsFile::read_from_path(&path).unwrap(), results);
        assert_eq!(ResultsFile::count_records_path(&path).unwrap(), 3);
    }

    #[test]
    fn empty_results_read_back_as_empty() {
        let mut buffer = Vec::new();
        ResultsFile::write_to(&Vec::new(), &mut buffer).unwrap();
        assert!(ResultsFile::read_from(buffer.as_slice()).unwrap().is_empty());
    }

    #[test]
    fn header_uses_sequence_column_name() {
        let mut buffer = Vec::new();
        ResultsFile::write_to(&vec![result("P1", 2)], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with(
            "accession\tsequence\tcompetitor_count\tfragments_available\tfragments_needed\n"
        ));
    }
}
