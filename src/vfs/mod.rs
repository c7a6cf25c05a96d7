//! Virtual tree projection over the repository collection
//!
//! The tree is rebuilt from scratch on every projection request and
//! discarded when the caller is done navigating it. Top level:
//! `/repos` (canonical entries), `/by-language`, `/by-tag`, `/by-status`
//! (grouping symlinks) and `/config` (flat configuration values).

pub mod builder;
pub mod resolver;
pub mod types;

pub use builder::build_tree;
pub use resolver::{collect_repo_paths, resolve};
pub use types::VfsNode;
