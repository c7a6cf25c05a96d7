//! Virtual tree node types
//!
//! The tree is a pure in-memory projection: directories hold children by
//! name, leaves point at concrete repository paths or carry a
//! configuration value. Children live in a `BTreeMap`, so two trees
//! built from identical inputs compare equal regardless of insertion
//! order.

use std::collections::BTreeMap;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Fixed top-level directories of every projected tree
pub const REPOS_DIR: &str = "repos";
pub const BY_LANGUAGE_DIR: &str = "by-language";
pub const BY_TAG_DIR: &str = "by-tag";
pub const BY_STATUS_DIR: &str = "by-status";
pub const CONFIG_DIR: &str = "config";

/// One node of the virtual tree
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum VfsNode {
    /// Named children, unique per name
    Directory(BTreeMap<String, VfsNode>),
    /// Canonical entry for one repository; holds its concrete path
    Repository(PathBuf),
    /// Grouped entry pointing back at the canonical `/repos/<name>`
    /// node, with the concrete path alongside for fan-out
    Symlink { target: String, path: PathBuf },
    /// A projected configuration value
    ConfigValue(String),
}

impl VfsNode {
    /// Create an empty directory node
    #[must_use]
    pub fn empty_dir() -> Self {
        Self::Directory(BTreeMap::new())
    }

    /// True for directory nodes
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// The children map, for directory nodes only
    #[must_use]
    pub const fn children(&self) -> Option<&BTreeMap<String, VfsNode>> {
        match self {
            Self::Directory(children) => Some(children),
            _ => None,
        }
    }
}
