//! Testing utilities for reposcope
//!
//! Small fixture helpers shared by the unit tests.
//!
//! Only available when compiled with `cfg(test)`.

use std::path::PathBuf;

use crate::Repo;

/// Create a repository fixture rooted under `/src`
#[must_use]
pub fn repo(name: &str) -> Repo {
    Repo::new(name.to_string(), PathBuf::from(format!("/src/{name}")))
}
