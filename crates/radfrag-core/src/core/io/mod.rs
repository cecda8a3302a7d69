//! Readers and writers for the tab-separated artifacts the explorer consumes
//! and produces.
//!
//! Every artifact implements [`ArtifactFile`](traits::ArtifactFile), so the
//! engine can load, store and atomically replace any of them through the same
//! calls. Lists of masses inside a single field are joined with `;`.

pub mod error;
pub mod histogram;
pub mod index;
pub mod proteoforms;
pub mod results;
pub mod traits;

pub(crate) const LIST_SEPARATOR: char = ';';

use error::ArtifactError;
use itertools::Itertools;

pub(crate) fn tsv_reader<R: std::io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(reader)
}

pub(crate) fn tsv_writer<W: std::io::Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_writer(writer)
}

pub(crate) fn join_masses(masses: &[f64]) -> String {
    masses.iter().join(&LIST_SEPARATOR.to_string())
}

pub(crate) fn parse_masses(
    field: &str,
    line: u64,
    name: &'static str,
) -> Result<Vec<f64>, ArtifactError> {
    field
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse::<f64>().map_err(|_| ArtifactError::MalformedField {
                line,
                field: name,
                value: value.to_string(),
            })
        })
        .collect()
}
