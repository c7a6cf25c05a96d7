//! External collaborator interfaces
//!
//! The core never performs I/O; repository lists, metadata records and
//! tag sets arrive through the traits defined here.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::StoreError;
pub use memory::{MemoryStore, StaticDiscovery};
pub use traits::{MetadataStore, RepoDiscovery, TagStore};
