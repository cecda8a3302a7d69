//! # Workflows Module
//!
//! High-level entry points that tie the [`engine`](crate::engine) and
//! [`core`](crate::core) layers together into complete runs.
//!
//! - **Explore Workflow** ([`explore`]) - Builds the candidate index, groups
//!   candidates by precursor mass and finds how many fragments each needs,
//!   resuming from whatever artifacts a previous run left behind.

pub mod explore;
