//! State management module
//!
//! Tracks the replication bookmark per stream and the stream that was in
//! flight, so an interrupted sync resumes where it stopped.
//!
//! # Overview
//!
//! - `State` - serializable bookmark state
//! - `StateManager` - shared handle with atomic file persistence

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{Bookmarks, State};

#[cfg(test)]
mod manager_tests;
