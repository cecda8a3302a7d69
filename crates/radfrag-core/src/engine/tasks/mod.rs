//! Computational units of an explorer run.
//!
//! Each task covers one step of the pipeline and can be used on its own:
//! [`indexing`] turns proteoforms into a de-duplicated candidate index,
//! [`grouping`] collects precursor-mass competitors, [`discrimination`] finds
//! how many fragments separate a target from them, and [`chunking`] runs the
//! last two over resumable slices of the index.

pub mod chunking;
pub mod discrimination;
pub mod grouping;
pub mod indexing;
