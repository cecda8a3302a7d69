//! # radfrag Core Library
//!
//! Explores how many fragment-ion masses are needed to tell each candidate
//! molecule of a digested proteoform database apart from every other candidate
//! sharing its precursor mass within instrument tolerance.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`PrecursorCandidate`,
//!   `Proteoform`), the mass tolerance model, fragmentation strategies and
//!   artifact I/O.
//!
//! - **[`engine`]: The Logic Core.** Configuration, progress reporting and the
//!   tasks that build the index, group candidates by precursor mass and search
//!   for minimal discriminating fragment sets, chunk by chunk.
//!
//! - **[`workflows`]: The Public API.** Complete, resumable runs that tie the
//!   `engine` and `core` together.

pub mod core;
pub mod engine;
pub mod workflows;
