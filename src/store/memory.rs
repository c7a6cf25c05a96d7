//! In-memory store implementation
//!
//! Backs the collaborator traits with plain maps keyed by repository
//! name. Embedding callers that already hold a snapshot use this
//! directly; tests use it everywhere.

use std::collections::HashMap;

use crate::Repo;
use crate::metadata::MetadataRecord;
use crate::store::error::StoreError;
use crate::store::traits::{MetadataStore, RepoDiscovery, TagStore};

/// Map-backed metadata and tag store
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    metadata: HashMap<String, MetadataRecord>,
    tags: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a metadata record to a repository name
    pub fn insert_metadata(&mut self, name: impl Into<String>, record: MetadataRecord) {
        self.metadata.insert(name.into(), record);
    }

    /// Attach tags to a repository name
    pub fn insert_tags(&mut self, name: impl Into<String>, tags: Vec<String>) {
        self.tags.insert(name.into(), tags);
    }
}

/// Discovery over a fixed, already-known repository list
#[derive(Clone, Debug, Default)]
pub struct StaticDiscovery {
    repos: Vec<Repo>,
}

impl StaticDiscovery {
    /// Wrap an existing repository list
    #[must_use]
    pub const fn new(repos: Vec<Repo>) -> Self {
        Self { repos }
    }
}

impl RepoDiscovery for StaticDiscovery {
    fn discover(&self) -> Result<Vec<Repo>, StoreError> {
        Ok(self.repos.clone())
    }
}

impl MetadataStore for MemoryStore {
    fn metadata(&self, repo: &Repo) -> Option<MetadataRecord> {
        self.metadata.get(&repo.name).cloned()
    }
}

impl TagStore for MemoryStore {
    fn tags(&self, repo: &Repo) -> Vec<String> {
        self.tags.get(&repo.name).cloned().unwrap_or_default()
    }
}
