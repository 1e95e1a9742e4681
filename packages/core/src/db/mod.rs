//! Repository Layer
//!
//! This module defines how Locus talks to the content repository:
//!
//! - Collaborator traits for locations, trash, content, content types,
//!   permissions and paths
//! - Store error types shared by every collaborator
//! - Domain events describing completed location mutations
//! - An in-memory repository implementing all collaborator traits
//!
//! # Architecture
//!
//! The orchestrator in [`crate::services`] depends only on the traits defined
//! here. Any repository client can be plugged in by implementing them; the
//! in-memory repository is the reference implementation used in tests and
//! development tooling.

mod error;
pub mod events;
mod location_store;
mod memory_store;

pub use error::{StoreError, StoreResult};
pub use events::{LocationChange, LocationEvent};
pub use location_store::{
    ContentStore, ContentTypeStore, LocationStore, PathResolver, PermissionResolver, TrashStore,
};
#[cfg(test)]
pub use location_store::{
    MockContentStore, MockContentTypeStore, MockLocationStore, MockPathResolver,
    MockPermissionResolver, MockTrashStore,
};
pub use memory_store::{
    InMemoryRepository, TrashItem, FOLDER_CONTENT_TYPE_ID, ROOT_CONTENT_ID, ROOT_LOCATION_ID,
};
