use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of the protein or proteoform a candidate was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessionId(String);

impl AccessionId {
    pub fn new(accession: impl Into<String>) -> Self {
        Self(accession.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
