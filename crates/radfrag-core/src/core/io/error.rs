use crate::core::models::proteoform::ProteoformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed value '{value}' in field '{field}' on line {line}")]
    MalformedField {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("Invalid record on line {line}: {source}")]
    InvalidRecord {
        line: u64,
        #[source]
        source: ProteoformError,
    },
}
