//! # Engine Module
//!
//! The stateful layer of the explorer: configuration, error types, progress
//! reporting, the stage state machine and the tasks that do the actual work.
//!
//! - **Configuration** ([`config`]) - Explorer settings, builder and artifact naming
//! - **State Tracking** ([`state`]) - Stage progression and produced data
//! - **Progress Monitoring** ([`progress`]) - Observer injected by the caller
//! - **Error Handling** ([`error`]) - Engine-level error type
//! - **Tasks** ([`tasks`]) - Indexing, grouping, fragment search and chunking

pub mod config;
pub mod error;
pub mod progress;
pub mod state;
pub mod tasks;
