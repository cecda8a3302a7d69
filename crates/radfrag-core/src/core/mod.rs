//! # Core Module
//!
//! Stateless building blocks of the explorer: the mass tolerance model, the
//! data types every layer shares, artifact I/O, and the fragmentation
//! strategies that turn digested proteoforms into comparable candidates.
//!
//! - **Tolerance** ([`tolerance`]) - ppm windows with missed monoisotopic peaks
//! - **Data Models** ([`models`]) - Proteoforms, candidates and results
//! - **File I/O** ([`io`]) - Tab-separated index, histogram and result artifacts
//! - **Fragmentation** ([`fragmentation`]) - Pluggable candidate generation

pub mod fragmentation;
pub mod io;
pub mod models;
pub mod tolerance;
