//! Location Orchestrator - Location Management for Admin Screens
//!
//! This module provides the business logic layer between admin controllers
//! and the content repository for everything concerning locations:
//!
//! - Loading the locations of a content item decorated for display
//! - Permission checks for remove/move actions
//! - Tree mutations (add, delete, trash, move, copy, swap)
//!
//! # Placement Rules
//!
//! The repository happily performs tree mutations that leave content in an
//! inconsistent shape for editors. Before delegating, the orchestrator
//! enforces:
//!
//! - Locations of the root content are never removed, moved or swapped
//! - Move and copy targets must be of a container content type
//! - A location with children may only be swapped with a container location
//!
//! Violations are reported as `InvalidPlacement` before any mutating store
//! call is made.
//!
//! # Consistency
//!
//! Every operation is a short read, validate, mutate, re-read sequence. No
//! transaction spans several store calls and nothing is retried: a location
//! changed concurrently between two steps surfaces as the store's error.

use crate::config::LocationServiceConfig;
use crate::db::{
    ContentStore, ContentTypeStore, LocationChange, LocationEvent, LocationStore, PathResolver,
    PermissionResolver, TrashStore,
};
use crate::models::{ContentInfo, Location, LocationCreateRequest, LocationId, UiLocation};
use crate::services::error::LocationServiceError;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Collaborators the orchestrator delegates to
///
/// Each field is an independent trait object so deployments and tests can
/// substitute any of them. Use [`LocationServiceDeps::from_repository`] when
/// one object implements all contracts.
#[derive(Clone)]
pub struct LocationServiceDeps {
    pub locations: Arc<dyn LocationStore>,
    pub trash: Arc<dyn TrashStore>,
    pub contents: Arc<dyn ContentStore>,
    pub content_types: Arc<dyn ContentTypeStore>,
    pub permissions: Arc<dyn PermissionResolver>,
    pub paths: Arc<dyn PathResolver>,
}

impl LocationServiceDeps {
    /// Wire every collaborator to the same repository object
    ///
    /// # Examples
    ///
    /// ```rust
    /// use locus_core::db::InMemoryRepository;
    /// use locus_core::services::LocationServiceDeps;
    /// use std::sync::Arc;
    ///
    /// let deps = LocationServiceDeps::from_repository(Arc::new(InMemoryRepository::new()));
    /// ```
    pub fn from_repository<R>(repository: Arc<R>) -> Self
    where
        R: LocationStore
            + TrashStore
            + ContentStore
            + ContentTypeStore
            + PermissionResolver
            + PathResolver
            + 'static,
    {
        Self {
            locations: repository.clone(),
            trash: repository.clone(),
            contents: repository.clone(),
            content_types: repository.clone(),
            permissions: repository.clone(),
            paths: repository,
        }
    }
}

/// Order decorated locations so the main location comes first
///
/// Stable partition: the remaining locations keep their relative order.
///
/// # Examples
///
/// ```rust
/// # use locus_core::models::{ContentInfo, Location, UiLocation};
/// # use locus_core::services::prioritize_main_location;
/// # fn ui(id: i64, main: bool) -> UiLocation {
/// #     UiLocation {
/// #         location: Location::new(id, Some(2), ContentInfo::new(42, 1, "a", None)),
/// #         child_count: 0,
/// #         path_locations: vec![],
/// #         user_can_manage: true,
/// #         user_can_remove: true,
/// #         main,
/// #     }
/// # }
/// let ordered = prioritize_main_location(vec![ui(10, false), ui(11, true), ui(12, false)]);
/// let ids: Vec<_> = ordered.iter().map(|l| l.id()).collect();
/// assert_eq!(ids, vec![11, 10, 12]);
/// ```
pub fn prioritize_main_location(locations: Vec<UiLocation>) -> Vec<UiLocation> {
    let (main, others): (Vec<_>, Vec<_>) = locations.into_iter().partition(|l| l.main);
    main.into_iter().chain(others).collect()
}

/// Location orchestration service
///
/// Cheap to clone; clones share collaborators and the event channel.
///
/// # Examples
///
/// ```rust
/// use locus_core::config::LocationServiceConfig;
/// use locus_core::db::{InMemoryRepository, ROOT_LOCATION_ID};
/// use locus_core::services::{LocationOrchestrator, LocationServiceDeps};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repository = Arc::new(InMemoryRepository::new());
/// let orchestrator = LocationOrchestrator::new(
///     LocationServiceDeps::from_repository(repository.clone()),
///     LocationServiceConfig::default(),
/// )?;
///
/// let home = repository.content_info(1).await?;
/// let locations = orchestrator.load_locations(&home).await?;
/// assert_eq!(locations[0].id(), ROOT_LOCATION_ID);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocationOrchestrator {
    locations: Arc<dyn LocationStore>,
    trash: Arc<dyn TrashStore>,
    contents: Arc<dyn ContentStore>,
    content_types: Arc<dyn ContentTypeStore>,
    permissions: Arc<dyn PermissionResolver>,
    paths: Arc<dyn PathResolver>,

    config: LocationServiceConfig,

    /// Broadcast channel for location events
    event_tx: broadcast::Sender<LocationEvent>,
}

impl LocationOrchestrator {
    /// Create a new orchestrator
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration fails validation
    pub fn new(
        deps: LocationServiceDeps,
        config: LocationServiceConfig,
    ) -> Result<Self, LocationServiceError> {
        config
            .validate()
            .map_err(LocationServiceError::invalid_config)?;

        let (event_tx, _) = broadcast::channel(config.event_channel_capacity);

        Ok(Self {
            locations: deps.locations,
            trash: deps.trash,
            contents: deps.contents,
            content_types: deps.content_types,
            permissions: deps.permissions,
            paths: deps.paths,
            config,
            event_tx,
        })
    }

    /// Return a clone that stamps `client_id` on every emitted event
    pub fn with_client(&self, client_id: impl Into<String>) -> Self {
        let mut cloned = self.clone();
        cloned.config.client_id = Some(client_id.into());
        cloned
    }

    pub fn config(&self) -> &LocationServiceConfig {
        &self.config
    }

    /// Subscribe to location events
    ///
    /// Only mutations that completed in the store are reported.
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<LocationEvent> {
        self.event_tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Having no subscriber is not an error.
    fn emit_event(&self, change: LocationChange) {
        let _ = self
            .event_tx
            .send(LocationEvent::new(change, self.config.client_id.clone()));
    }

    fn is_root_location(&self, location: &Location) -> bool {
        location.content_id() == self.config.root_content_id
    }

    /// Reject `action` (e.g. "move") on a location holding the root content
    fn ensure_not_root(
        &self,
        argument: &str,
        location: &Location,
        action: &str,
    ) -> Result<(), LocationServiceError> {
        if self.is_root_location(location) {
            tracing::warn!("Refusing to {} root location {}", action, location.id);
            return Err(LocationServiceError::invalid_placement(
                argument,
                format!("Cannot {} the root location", action),
            ));
        }
        Ok(())
    }

    /// Load a location that is about to receive children
    async fn load_container_parent(
        &self,
        parent_location_id: LocationId,
        reason: &str,
    ) -> Result<Location, LocationServiceError> {
        let parent = self.locations.load_location(parent_location_id).await?;
        let content_type = self
            .content_types
            .load_content_type(parent.content_info.content_type_id)
            .await?;

        if !content_type.is_container {
            tracing::warn!(
                "Location {} of type '{}' is not a container",
                parent.id,
                content_type.identifier
            );
            return Err(LocationServiceError::invalid_placement(
                "new_parent_location",
                reason,
            ));
        }

        Ok(parent)
    }

    async fn build_ui_location(
        &self,
        location: Location,
    ) -> Result<UiLocation, LocationServiceError> {
        let child_count = self.locations.get_location_child_count(&location).await?;
        let path_locations = self.paths.load_path_locations(&location).await?;
        let user_can_manage = self
            .permissions
            .can_manage_locations(&location.content_info)
            .await?;
        let user_can_remove = self
            .permissions
            .can_remove_content(&location.content_info, &location)
            .await?;
        let main = location.is_main();

        Ok(UiLocation {
            location,
            child_count,
            path_locations,
            user_can_manage,
            user_can_remove,
            main,
        })
    }

    /// Load all locations of a content item, decorated for admin screens
    ///
    /// Each location gets its child count, path, the current user's
    /// manage/remove permissions and its main flag. The main location is
    /// returned first; the others keep the store's order. Content without
    /// locations yields an empty list.
    pub async fn load_locations(
        &self,
        content_info: &ContentInfo,
    ) -> Result<Vec<UiLocation>, LocationServiceError> {
        tracing::debug!("Loading ui locations for content {}", content_info.id);

        let locations = self.locations.load_locations(content_info).await?;

        let mut ui_locations = Vec::with_capacity(locations.len());
        for location in locations {
            ui_locations.push(self.build_ui_location(location).await?);
        }

        Ok(prioritize_main_location(ui_locations))
    }

    /// Permanently delete the given locations, in order
    ///
    /// Fails fast: the first failure is returned and the remaining ids are
    /// not processed. Deletions completed before the failure stay applied.
    ///
    /// # Errors
    ///
    /// - `NotFound` if a location does not exist
    /// - `PermissionDenied` if the user may not delete a location
    /// - `InvalidPlacement` for a location of the root content
    pub async fn delete_locations(
        &self,
        location_ids: &[LocationId],
    ) -> Result<(), LocationServiceError> {
        for &location_id in location_ids {
            let location = self.locations.load_location(location_id).await?;
            self.ensure_not_root("location", &location, "remove")?;

            self.locations.delete_location(&location).await?;

            tracing::info!("Deleted location {}", location_id);
            self.emit_event(LocationChange::Deleted { location_id });
        }

        Ok(())
    }

    /// Trash a location and return its parent, reloaded from the store
    ///
    /// # Errors
    ///
    /// - `InvalidPlacement` for a location of the root content or one without parent
    /// - `PermissionDenied` if the user may not trash the location
    /// - `NotFound` if the parent disappeared meanwhile
    pub async fn trash_location_and_return_parent(
        &self,
        location: &Location,
    ) -> Result<Location, LocationServiceError> {
        self.ensure_not_root("location", location, "remove")?;
        let parent_location_id = location.parent_location_id.ok_or_else(|| {
            LocationServiceError::invalid_placement(
                "location",
                format!("Location {} has no parent location", location.id),
            )
        })?;

        self.trash.trash(location).await?;

        tracing::info!(
            "Trashed location {} (parent {})",
            location.id,
            parent_location_id
        );
        self.emit_event(LocationChange::Trashed {
            location_id: location.id,
            parent_location_id,
        });

        Ok(self.locations.load_location(parent_location_id).await?)
    }

    /// Whether the current user may remove the location
    ///
    /// Always false for locations of the root content.
    pub async fn can_remove_location(
        &self,
        location: &Location,
    ) -> Result<bool, LocationServiceError> {
        if self.is_root_location(location) {
            return Ok(false);
        }

        Ok(self
            .permissions
            .can_remove_content(&location.content_info, location)
            .await?)
    }

    /// Whether the location may be moved
    ///
    /// Only the root check applies; the permission resolver is not consulted.
    /// The move itself is still subject to the store's access control.
    pub fn can_move_location(&self, location: &Location) -> bool {
        !self.is_root_location(location)
    }

    /// Place the content at an additional location under `parent_location_id`
    ///
    /// Not idempotent: calling twice creates two locations.
    pub async fn add_location(
        &self,
        content_info: &ContentInfo,
        parent_location_id: LocationId,
    ) -> Result<(), LocationServiceError> {
        let request = LocationCreateRequest::new(parent_location_id);
        let created = self
            .locations
            .create_location(content_info, request)
            .await?;

        tracing::info!(
            "Created location {} for content {} under {}",
            created.id,
            content_info.id,
            parent_location_id
        );
        self.emit_event(LocationChange::Created {
            location_id: created.id,
            content_id: content_info.id,
            parent_location_id,
        });

        Ok(())
    }

    /// Swap the content of `current_location` with that of `new_location_id`
    ///
    /// Returns the current location reloaded by id, which now holds the
    /// content previously found at `new_location_id`.
    ///
    /// # Errors
    ///
    /// `InvalidPlacement`, with no swap attempted, if either location holds
    /// the root content, or if the current location has children and the
    /// target's content type is not a container (the children would end up
    /// below a non-container).
    pub async fn swap_locations(
        &self,
        current_location: &Location,
        new_location_id: LocationId,
    ) -> Result<Location, LocationServiceError> {
        self.ensure_not_root("location", current_location, "swap")?;

        let new_location = self.locations.load_location(new_location_id).await?;
        self.ensure_not_root("new_location", &new_location, "swap")?;

        let child_count = self
            .locations
            .get_location_child_count(current_location)
            .await?;
        let content_type = self
            .content_types
            .load_content_type(new_location.content_info.content_type_id)
            .await?;

        if !content_type.is_container && child_count > 0 {
            tracing::warn!(
                "Refusing to swap location {} ({} children) with non-container location {}",
                current_location.id,
                child_count,
                new_location.id
            );
            return Err(LocationServiceError::invalid_placement(
                "new_location",
                "Cannot swap location that has sub items with a location that is not a container",
            ));
        }

        self.locations
            .swap_location(current_location, &new_location)
            .await?;

        tracing::info!(
            "Swapped locations {} and {}",
            current_location.id,
            new_location.id
        );
        self.emit_event(LocationChange::Swapped {
            location_id: current_location.id,
            other_location_id: new_location.id,
        });

        Ok(self.locations.load_location(current_location.id).await?)
    }

    /// Move a location and its subtree under a new parent
    ///
    /// Returns the location reloaded by id.
    ///
    /// # Errors
    ///
    /// `InvalidPlacement` for a location of the root content, or if the new
    /// parent is not a container. Nothing is moved in either case.
    pub async fn move_location(
        &self,
        current_location: &Location,
        new_parent_location_id: LocationId,
    ) -> Result<Location, LocationServiceError> {
        self.ensure_not_root("location", current_location, "move")?;

        let new_parent = self
            .load_container_parent(
                new_parent_location_id,
                "Cannot move location to a parent that is not a container",
            )
            .await?;

        self.locations
            .move_subtree(current_location, &new_parent)
            .await?;

        tracing::info!(
            "Moved location {} under {}",
            current_location.id,
            new_parent.id
        );
        self.emit_event(LocationChange::Moved {
            location_id: current_location.id,
            new_parent_location_id: new_parent.id,
        });

        Ok(self.locations.load_location(current_location.id).await?)
    }

    /// Copy the content at `current_location` (without its subtree) under a new parent
    ///
    /// Returns the main location of the copy.
    ///
    /// # Errors
    ///
    /// `InvalidPlacement` if the new parent is not a container; nothing is
    /// copied in that case.
    pub async fn copy_location(
        &self,
        current_location: &Location,
        new_parent_location_id: LocationId,
    ) -> Result<Location, LocationServiceError> {
        self.load_container_parent(
            new_parent_location_id,
            "Cannot copy location to a parent that is not a container",
        )
        .await?;

        let request = LocationCreateRequest::new(new_parent_location_id);
        let copied = self
            .contents
            .copy_content(&current_location.content_info, request)
            .await?;

        let copy_location_id = copied.content_info.main_location_id.ok_or_else(|| {
            LocationServiceError::store_failure(format!(
                "Copied content {} has no main location",
                copied.content_info.id
            ))
        })?;

        tracing::info!(
            "Copied content {} from location {} to location {}",
            current_location.content_id(),
            current_location.id,
            copy_location_id
        );
        self.emit_event(LocationChange::Copied {
            source_location_id: current_location.id,
            copy_location_id,
        });

        Ok(self.locations.load_location(copy_location_id).await?)
    }
}

#[cfg(test)]
#[path = "location_orchestrator_test.rs"]
mod location_orchestrator_test;
