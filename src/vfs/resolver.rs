//! Path lookup inside a projected tree
//!
//! Resolution walks children maps one slash-separated segment at a time
//! and degrades to `None` instead of failing: a missing segment or a
//! leaf reached mid-path simply means the path does not exist.

use std::path::PathBuf;

use crate::vfs::types::VfsNode;

/// Look up a slash-separated path inside the tree
///
/// `"/"` resolves to the root; a single trailing slash is tolerated.
///
/// # Examples
/// ```
/// use reposcope::vfs::{VfsNode, resolve};
///
/// let tree = VfsNode::empty_dir();
/// assert_eq!(resolve(&tree, "/"), Some(&tree));
/// assert_eq!(resolve(&tree, "/missing"), None);
/// ```
#[must_use]
pub fn resolve<'a>(tree: &'a VfsNode, path: &str) -> Option<&'a VfsNode> {
    if path == "/" {
        return Some(tree);
    }

    let path = path.strip_suffix('/').unwrap_or(path);
    let mut current = tree;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current = current.children()?.get(segment)?;
    }
    Some(current)
}

/// Collect every concrete repository path reachable under a node
///
/// Gathers `Repository` and `Symlink` targets recursively, in child
/// name order. Used by callers that fan an operation out over "all
/// repositories under this virtual path".
#[must_use]
pub fn collect_repo_paths(node: &VfsNode) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    collect(node, &mut paths);
    paths
}

fn collect(node: &VfsNode, paths: &mut Vec<PathBuf>) {
    match node {
        VfsNode::Directory(children) => {
            for child in children.values() {
                collect(child, paths);
            }
        }
        VfsNode::Repository(path) | VfsNode::Symlink { path, .. } => {
            paths.push(path.clone());
        }
        VfsNode::ConfigValue(_) => {}
    }
}
