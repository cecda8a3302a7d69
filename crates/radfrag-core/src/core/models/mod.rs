//! # Core Models Module
//!
//! Plain data types shared by every layer of the library.
//!
//! - [`ids`] - Accession identifiers
//! - [`proteoform`] - Digested input records with externally computed residue masses
//! - [`candidate`] - Precursor candidates and the same-molecule rule
//! - [`result`] - Discrimination results, fragment histograms and summaries

pub mod candidate;
pub mod ids;
pub mod proteoform;
pub mod result;
