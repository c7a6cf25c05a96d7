//! Virtual tree projection
//!
//! Builds a fresh tree from the current repository snapshot on every
//! call: the canonical entries under `/repos`, grouping symlinks under
//! `/by-language`, `/by-status` and `/by-tag`, and the flat `/config`
//! projection. Nothing is cached or patched incrementally.

use std::collections::BTreeMap;

use log::debug;
use serde_json::Value;

use crate::Repo;
use crate::config::ReposcopeConfig;
use crate::metadata::{MetadataRecord, scalar_text};
use crate::search::hierarchy::tag_levels;
use crate::store::{MetadataStore, TagStore};
use crate::vfs::types::{
    BY_LANGUAGE_DIR, BY_STATUS_DIR, BY_TAG_DIR, CONFIG_DIR, REPOS_DIR, VfsNode,
};

/// Language bucket for repositories without a language field
const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Project a repository snapshot into a navigable virtual tree
///
/// Every repository gains a canonical `Repository` node under
/// `/repos/<name>` and grouping symlinks under `/by-language/<language>`,
/// `/by-status/{dirty,clean}` and one nested `/by-tag` path per tag.
/// Identical inputs always produce structurally identical trees.
#[must_use]
pub fn build_tree(
    repos: &[Repo],
    metadata: &dyn MetadataStore,
    tags: &dyn TagStore,
    config: &ReposcopeConfig,
) -> VfsNode {
    let mut root: BTreeMap<String, VfsNode> = BTreeMap::new();
    for name in [REPOS_DIR, BY_LANGUAGE_DIR, BY_TAG_DIR, BY_STATUS_DIR, CONFIG_DIR] {
        root.insert(name.to_string(), VfsNode::empty_dir());
    }

    for repo in repos {
        let record = metadata.metadata(repo).unwrap_or_default();
        let link = VfsNode::Symlink {
            target: format!("/{REPOS_DIR}/{}", repo.name),
            path: repo.path.clone(),
        };

        get_or_create_dir(&mut root, REPOS_DIR)
            .insert(repo.name.clone(), VfsNode::Repository(repo.path.clone()));

        let language = record
            .get("language")
            .and_then(scalar_text)
            .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());
        let by_language = get_or_create_dir(&mut root, BY_LANGUAGE_DIR);
        get_or_create_dir(by_language, &language).insert(repo.name.clone(), link.clone());

        let by_status = get_or_create_dir(&mut root, BY_STATUS_DIR);
        get_or_create_dir(by_status, status_key(&record)).insert(repo.name.clone(), link.clone());

        let by_tag = get_or_create_dir(&mut root, BY_TAG_DIR);
        for tag in tags.tags(repo) {
            let mut dir = &mut *by_tag;
            for level in tag_levels(&tag) {
                dir = get_or_create_dir(dir, level);
            }
            dir.insert(repo.name.clone(), link.clone());
        }
    }

    let config_dir = get_or_create_dir(&mut root, CONFIG_DIR);
    for (key, value) in config.entries() {
        config_dir.insert(key, VfsNode::ConfigValue(value));
    }

    debug!("projected virtual tree over {} repositories", repos.len());
    VfsNode::Directory(root)
}

/// Dirty/clean bucket from the record's status flags
fn status_key(record: &MetadataRecord) -> &'static str {
    let dirty = flag(record, "has_uncommitted_changes") || flag(record, "has_unpushed_commits");
    if dirty { "dirty" } else { "clean" }
}

fn flag(record: &MetadataRecord, key: &str) -> bool {
    matches!(record.get(key), Some(Value::Bool(true)))
}

/// Fetch the named child as a directory, creating it when missing and
/// replacing any non-directory occupant
fn get_or_create_dir<'a>(
    children: &'a mut BTreeMap<String, VfsNode>,
    name: &str,
) -> &'a mut BTreeMap<String, VfsNode> {
    let entry = children
        .entry(name.to_string())
        .or_insert_with(VfsNode::empty_dir);
    if !entry.is_dir() {
        *entry = VfsNode::empty_dir();
    }
    match entry {
        VfsNode::Directory(children) => children,
        _ => unreachable!("entry was just made a directory"),
    }
}
