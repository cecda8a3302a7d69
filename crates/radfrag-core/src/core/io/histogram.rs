use super::error::ArtifactError;
use super::traits::ArtifactFile;
use super::{tsv_reader, tsv_writer};
use crate::core::models::result::FragmentHistogram;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Debug, Serialize, Deserialize)]
struct HistogramRow {
    fragment_count: usize,
    candidate_count: usize,
}

/// How many candidates have each number of distinct fragments.
pub struct HistogramFile;

impl ArtifactFile for HistogramFile {
    type Content = FragmentHistogram;

    fn read_from(reader: impl Read) -> Result<Self::Content, ArtifactError> {
        let mut reader = tsv_reader(reader);
        let mut histogram = FragmentHistogram::default();
        for row in reader.deserialize::<HistogramRow>() {
            let row = row?;
            histogram.add(row.fragment_count, row.candidate_count);
        }
        Ok(histogram)
    }

    fn write_to(content: &Self::Content, writer: impl Write) -> Result<(), ArtifactError> {
        let mut writer = tsv_writer(writer);
        for (fragment_count, candidate_count) in content.iter() {
            writer.serialize(HistogramRow {
                fragment_count,
                candidate_count,
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_is_written_in_ascending_bins() {
        let histogram = FragmentHistogram::from_counts([4, 2, 4, 0]);
        let mut buffer = Vec::new();
        HistogramFile::write_to(&histogram, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "fragment_count\tcandidate_count\n0\t1\n2\t1\n4\t2\n");

        let loaded = HistogramFile::read_from(text.as_bytes()).unwrap();
        assert_eq!(loaded, histogram);
    }
}
