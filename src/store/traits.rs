//! Trait seams for the external collaborators that feed the core
//!
//! Discovery, metadata and tags come from outside: a filesystem walker,
//! a status collector shelling out to version control, a tag database.
//! The core only consumes these interfaces; implementations own all I/O,
//! retries and timeouts.

use crate::Repo;
use crate::metadata::MetadataRecord;
use crate::store::error::StoreError;

/// Trait for producing the repository list
pub trait RepoDiscovery {
    /// Discover the repositories to index.
    ///
    /// # Errors
    /// Returns `StoreError` if the underlying source cannot be
    /// enumerated.
    fn discover(&self) -> Result<Vec<Repo>, StoreError>;
}

/// Trait for supplying per-repository metadata records
pub trait MetadataStore {
    /// Fetch the metadata record for one repository, if any is known
    fn metadata(&self, repo: &Repo) -> Option<MetadataRecord>;
}

/// Trait for supplying per-repository tag sets
pub trait TagStore {
    /// Fetch the tags attached to one repository
    fn tags(&self, repo: &Repo) -> Vec<String>;
}
