//! Collaborator Traits - Repository Abstraction Layer
//!
//! This module defines the contracts of the external repository services the
//! location orchestrator delegates to. The orchestrator never talks to a
//! concrete backend; it receives trait objects at construction, so tests can
//! substitute mocks and deployments can plug in any repository client.
//!
//! # Contracts
//!
//! - `LocationStore` - location reads and tree mutations
//! - `TrashStore` - recoverable soft-delete
//! - `ContentStore` - content copy
//! - `ContentTypeStore` - content type lookup
//! - `PermissionResolver` - capability checks for the current user
//! - `PathResolver` - ancestor chain of a location
//!
//! All methods are async so that both embedded and networked backends fit
//! behind the same interface. Implementations must be `Send + Sync`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use locus_core::db::{InMemoryRepository, LocationStore, ROOT_LOCATION_ID};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = InMemoryRepository::new();
//! let root = repository.load_location(ROOT_LOCATION_ID).await?;
//! let count = repository.get_location_child_count(&root).await?;
//! println!("Root has {} children", count);
//! # Ok(())
//! # }
//! ```

use crate::db::error::StoreResult;
use crate::models::{
    Content, ContentInfo, ContentType, ContentTypeId, Location, LocationCreateRequest, LocationId,
};
use async_trait::async_trait;

/// Location reads and tree mutations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Load a location by id
    ///
    /// # Errors
    ///
    /// `NotFound` if the location does not exist (or sits in the trash)
    async fn load_location(&self, id: LocationId) -> StoreResult<Location>;

    /// Load all locations of a content item, in store order
    async fn load_locations(&self, content_info: &ContentInfo) -> StoreResult<Vec<Location>>;

    /// Count the direct children of a location
    async fn get_location_child_count(&self, location: &Location) -> StoreResult<usize>;

    /// Place an existing content item under the requested parent
    ///
    /// Not idempotent: every call creates a new location.
    async fn create_location(
        &self,
        content_info: &ContentInfo,
        request: LocationCreateRequest,
    ) -> StoreResult<Location>;

    /// Permanently delete a location and its subtree
    async fn delete_location(&self, location: &Location) -> StoreResult<()>;

    /// Move a location and all its descendants under a new parent
    async fn move_subtree(&self, location: &Location, new_parent: &Location) -> StoreResult<()>;

    /// Exchange the content placed at two locations
    ///
    /// Location ids keep their tree positions; the content behind them swaps.
    async fn swap_location(&self, location1: &Location, location2: &Location) -> StoreResult<()>;
}

/// Recoverable soft-delete of locations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrashStore: Send + Sync {
    /// Move a location and its subtree to the trash
    async fn trash(&self, location: &Location) -> StoreResult<()>;
}

/// Content-level operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Copy a single content item (not its subtree) to a new location
    ///
    /// The copy is new content whose main location is the location created
    /// from `request`.
    async fn copy_content(
        &self,
        content_info: &ContentInfo,
        request: LocationCreateRequest,
    ) -> StoreResult<Content>;
}

/// Content type lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentTypeStore: Send + Sync {
    async fn load_content_type(&self, id: ContentTypeId) -> StoreResult<ContentType>;
}

/// Capability checks for the current user
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionResolver: Send + Sync {
    /// Whether the user may add or manage locations of the content
    async fn can_manage_locations(&self, content_info: &ContentInfo) -> StoreResult<bool>;

    /// Whether the user may remove the content from the given location
    async fn can_remove_content(
        &self,
        content_info: &ContentInfo,
        location: &Location,
    ) -> StoreResult<bool>;
}

/// Ancestor chain lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PathResolver: Send + Sync {
    /// Load the path of a location, top of the tree first
    async fn load_path_locations(&self, location: &Location) -> StoreResult<Vec<Location>>;
}
