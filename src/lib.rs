//! Reposcope - an index over a personal collection of repositories
//!
//! This library parses filter queries into boolean expression trees,
//! evaluates them fuzzily against per-repository metadata, and projects
//! the collection into a navigable virtual tree grouped by language,
//! status and hierarchical tags.

use std::path::PathBuf;
use serde::{Serialize, Deserialize};
use thiserror::Error;

pub mod config;
pub mod metadata;
pub mod query;
pub mod search;
pub mod store;
pub mod vfs;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum ReposcopeError {
    /// Query syntax error
    #[error("Query error: {0}")]
    QueryError(#[from] query::ParseError),
    /// Store error
    #[error("Store error: {0}")]
    StoreError(#[from] store::StoreError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Data struct identifying one repository in the collection
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Repo {
    pub name: String,
    pub path: PathBuf,
}

impl Repo {
    /// Create a new Repo
    #[must_use]
    pub const fn new(name: String, path: PathBuf) -> Self {
        Self { name, path }
    }
}
