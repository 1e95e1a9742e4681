//! In-Memory Repository
//!
//! A single struct implementing every collaborator trait over shared
//! in-process state. It backs the integration tests, the benches and the
//! dev binary, and doubles as a reference for how a real repository client
//! is expected to behave.
//!
//! # Semantics
//!
//! - The repository starts with one location (`ROOT_LOCATION_ID`) holding
//!   the root content (`ROOT_CONTENT_ID`) of the container type `folder`.
//! - `load_locations` returns locations in creation order.
//! - Deleting removes the whole subtree; content left without any location
//!   is removed too, unless one of its locations is in the trash.
//! - Trashing removes the whole subtree into the trash, from where it can be
//!   restored as long as the original parent still exists.
//! - Swapping exchanges the content of two locations; main-location
//!   references follow the content.
//! - Permissions are granted unless explicitly denied per content item.

use crate::db::error::{StoreError, StoreResult};
use crate::db::location_store::{
    ContentStore, ContentTypeStore, LocationStore, PathResolver, PermissionResolver, TrashStore,
};
use crate::models::{
    Content, ContentId, ContentInfo, ContentType, ContentTypeId, Location, LocationCreateRequest,
    LocationId,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Location id of the top of the tree
pub const ROOT_LOCATION_ID: LocationId = 1;

/// Content id of the content placed at the top of the tree
pub const ROOT_CONTENT_ID: ContentId = 1;

/// Content type id of the built-in `folder` container type
pub const FOLDER_CONTENT_TYPE_ID: ContentTypeId = 1;

#[derive(Debug, Clone)]
struct LocationRecord {
    id: LocationId,
    parent_location_id: Option<LocationId>,
    content_id: ContentId,
    hidden: bool,
    priority: i32,
}

/// A trashed subtree, restorable through `InMemoryRepository::restore`
#[derive(Debug, Clone)]
pub struct TrashItem {
    /// Id of the location that was trashed (top of the trashed subtree)
    pub location_id: LocationId,

    pub original_parent_location_id: LocationId,

    /// Number of locations in the trashed subtree
    pub subtree_size: usize,

    records: Vec<LocationRecord>,
}

#[derive(Debug, Default)]
struct RepositoryState {
    /// Keyed by id; ids are handed out increasingly, so iteration order is creation order
    locations: BTreeMap<LocationId, LocationRecord>,
    contents: HashMap<ContentId, ContentInfo>,
    content_types: HashMap<ContentTypeId, ContentType>,
    trash: Vec<TrashItem>,
    remove_denied: HashSet<ContentId>,
    manage_denied: HashSet<ContentId>,
    next_location_id: LocationId,
    next_content_id: ContentId,
    next_content_type_id: ContentTypeId,
}

impl RepositoryState {
    fn seeded() -> Self {
        let mut state = Self {
            next_location_id: ROOT_LOCATION_ID + 1,
            next_content_id: ROOT_CONTENT_ID + 1,
            next_content_type_id: FOLDER_CONTENT_TYPE_ID + 1,
            ..Default::default()
        };

        state.content_types.insert(
            FOLDER_CONTENT_TYPE_ID,
            ContentType::new(FOLDER_CONTENT_TYPE_ID, "folder", true),
        );
        state.contents.insert(
            ROOT_CONTENT_ID,
            ContentInfo::new(
                ROOT_CONTENT_ID,
                FOLDER_CONTENT_TYPE_ID,
                "Home",
                Some(ROOT_LOCATION_ID),
            ),
        );
        state.locations.insert(
            ROOT_LOCATION_ID,
            LocationRecord {
                id: ROOT_LOCATION_ID,
                parent_location_id: None,
                content_id: ROOT_CONTENT_ID,
                hidden: false,
                priority: 0,
            },
        );

        state
    }

    fn record(&self, id: LocationId) -> StoreResult<&LocationRecord> {
        self.locations
            .get(&id)
            .ok_or_else(|| StoreError::not_found("Location", id))
    }

    fn content(&self, id: ContentId) -> StoreResult<&ContentInfo> {
        self.contents
            .get(&id)
            .ok_or_else(|| StoreError::not_found("Content", id))
    }

    /// Ids from the top of the tree down to and including `id`
    fn ancestry(&self, id: LocationId) -> StoreResult<Vec<LocationId>> {
        let mut chain = Vec::new();
        let mut current = Some(id);

        while let Some(current_id) = current {
            if chain.contains(&current_id) {
                return Err(StoreError::Backend(anyhow::anyhow!(
                    "Cycle detected in location tree at {}",
                    current_id
                )));
            }
            chain.push(current_id);
            current = self.record(current_id)?.parent_location_id;
        }

        chain.reverse();
        Ok(chain)
    }

    fn build_location(&self, id: LocationId) -> StoreResult<Location> {
        let record = self.record(id)?;
        let content_info = self.content(record.content_id)?.clone();
        let ancestry = self.ancestry(id)?;

        let path_string = ancestry
            .iter()
            .fold(String::from("/"), |mut path, ancestor_id| {
                path.push_str(&ancestor_id.to_string());
                path.push('/');
                path
            });

        Ok(Location {
            id: record.id,
            parent_location_id: record.parent_location_id,
            content_info,
            depth: (ancestry.len() - 1) as u32,
            path_string,
            hidden: record.hidden,
            priority: record.priority,
        })
    }

    /// `id` followed by all of its descendants, breadth first
    fn subtree(&self, id: LocationId) -> Vec<LocationId> {
        let mut ids = vec![id];
        let mut cursor = 0;

        while cursor < ids.len() {
            let parent = ids[cursor];
            ids.extend(
                self.locations
                    .values()
                    .filter(|record| record.parent_location_id == Some(parent))
                    .map(|record| record.id),
            );
            cursor += 1;
        }

        ids
    }

    fn insert_location(
        &mut self,
        content_id: ContentId,
        request: &LocationCreateRequest,
    ) -> LocationId {
        let id = self.next_location_id;
        self.next_location_id += 1;

        self.locations.insert(
            id,
            LocationRecord {
                id,
                parent_location_id: Some(request.parent_location_id),
                content_id,
                hidden: request.hidden,
                priority: request.priority,
            },
        );

        id
    }

    fn in_trash(&self, content_id: ContentId) -> bool {
        self.trash
            .iter()
            .flat_map(|item| item.records.iter())
            .any(|record| record.content_id == content_id)
    }

    /// Remove a subtree and repair main-location references of affected content
    ///
    /// With `drop_orphans`, content left without any location is removed
    /// unless one of its locations sits in the trash; otherwise its main
    /// location is cleared so it can be restored later.
    fn detach_subtree(&mut self, id: LocationId, drop_orphans: bool) -> Vec<LocationRecord> {
        let removed: Vec<LocationRecord> = self
            .subtree(id)
            .into_iter()
            .filter_map(|location_id| self.locations.remove(&location_id))
            .collect();

        let affected: HashSet<ContentId> = removed.iter().map(|record| record.content_id).collect();
        for content_id in affected {
            let remaining = self
                .locations
                .values()
                .find(|record| record.content_id == content_id)
                .map(|record| record.id);

            match remaining {
                None if drop_orphans && !self.in_trash(content_id) => {
                    self.contents.remove(&content_id);
                }
                _ => {
                    if let Some(info) = self.contents.get_mut(&content_id) {
                        let main_removed = info
                            .main_location_id
                            .map_or(true, |main| !self.locations.contains_key(&main));
                        if main_removed {
                            info.main_location_id = remaining;
                        }
                    }
                }
            }
        }

        removed
    }

    fn ensure_removable(&self, location: &Location, function: &str) -> StoreResult<()> {
        if self.remove_denied.contains(&location.content_id()) {
            return Err(StoreError::unauthorized(
                function,
                format!("location {}", location.id),
            ));
        }
        Ok(())
    }
}

/// In-process repository implementing every collaborator contract
///
/// Cloning is cheap and clones share the same state.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    state: Arc<RwLock<RepositoryState>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Create a repository holding only the root location
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(RepositoryState::seeded())),
        }
    }

    /// Register a content type and return its id
    pub async fn add_content_type(
        &self,
        identifier: impl Into<String>,
        is_container: bool,
    ) -> ContentTypeId {
        let mut state = self.state.write().await;
        let id = state.next_content_type_id;
        state.next_content_type_id += 1;
        state
            .content_types
            .insert(id, ContentType::new(id, identifier, is_container));
        id
    }

    /// Create a content item with its main location under `parent_location_id`
    pub async fn create_content(
        &self,
        name: impl Into<String>,
        content_type_id: ContentTypeId,
        parent_location_id: LocationId,
    ) -> StoreResult<Location> {
        let mut state = self.state.write().await;
        state.record(parent_location_id)?;
        if !state.content_types.contains_key(&content_type_id) {
            return Err(StoreError::not_found("ContentType", content_type_id));
        }

        let content_id = state.next_content_id;
        state.next_content_id += 1;

        let location_id =
            state.insert_location(content_id, &LocationCreateRequest::new(parent_location_id));
        state.contents.insert(
            content_id,
            ContentInfo::new(content_id, content_type_id, name, Some(location_id)),
        );

        state.build_location(location_id)
    }

    /// Load the current content info of a content item
    pub async fn content_info(&self, content_id: ContentId) -> StoreResult<ContentInfo> {
        self.state.read().await.content(content_id).cloned()
    }

    /// Deny the current user removing the given content
    pub async fn deny_remove(&self, content_id: ContentId) {
        self.state.write().await.remove_denied.insert(content_id);
    }

    /// Deny the current user managing locations of the given content
    pub async fn deny_manage(&self, content_id: ContentId) {
        self.state.write().await.manage_denied.insert(content_id);
    }

    /// Snapshot of the trash, oldest first
    pub async fn trashed(&self) -> Vec<TrashItem> {
        self.state.read().await.trash.clone()
    }

    /// Restore a trashed subtree to its original parent
    ///
    /// # Errors
    ///
    /// - `NotFound` if nothing with this location id is in the trash
    /// - `NotFound` if the original parent no longer exists
    /// - `NotFound` if content of a trashed location no longer exists
    ///
    /// Nothing changes when an error is returned.
    pub async fn restore(&self, location_id: LocationId) -> StoreResult<Location> {
        let mut state = self.state.write().await;
        let position = state
            .trash
            .iter()
            .position(|item| item.location_id == location_id)
            .ok_or_else(|| StoreError::not_found("TrashItem", location_id))?;

        let parent_id = state.trash[position].original_parent_location_id;
        state.record(parent_id)?;
        for record in &state.trash[position].records {
            state.content(record.content_id)?;
        }

        let item = state.trash.remove(position);
        for record in item.records {
            let content_id = record.content_id;
            let restored_id = record.id;
            state.locations.insert(restored_id, record);
            if let Some(info) = state.contents.get_mut(&content_id) {
                if info.main_location_id.is_none() {
                    info.main_location_id = Some(restored_id);
                }
            }
        }

        state.build_location(location_id)
    }
}

#[async_trait]
impl LocationStore for InMemoryRepository {
    async fn load_location(&self, id: LocationId) -> StoreResult<Location> {
        self.state.read().await.build_location(id)
    }

    async fn load_locations(&self, content_info: &ContentInfo) -> StoreResult<Vec<Location>> {
        let state = self.state.read().await;
        state
            .locations
            .values()
            .filter(|record| record.content_id == content_info.id)
            .map(|record| state.build_location(record.id))
            .collect()
    }

    async fn get_location_child_count(&self, location: &Location) -> StoreResult<usize> {
        let state = self.state.read().await;
        state.record(location.id)?;
        Ok(state
            .locations
            .values()
            .filter(|record| record.parent_location_id == Some(location.id))
            .count())
    }

    async fn create_location(
        &self,
        content_info: &ContentInfo,
        request: LocationCreateRequest,
    ) -> StoreResult<Location> {
        let mut state = self.state.write().await;
        state.record(request.parent_location_id)?;
        state.content(content_info.id)?;

        let id = state.insert_location(content_info.id, &request);
        if let Some(info) = state.contents.get_mut(&content_info.id) {
            if info.main_location_id.is_none() {
                info.main_location_id = Some(id);
            }
        }

        state.build_location(id)
    }

    async fn delete_location(&self, location: &Location) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.record(location.id)?;
        state.ensure_removable(location, "delete")?;
        state.detach_subtree(location.id, true);
        Ok(())
    }

    async fn move_subtree(&self, location: &Location, new_parent: &Location) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.record(new_parent.id)?;
        if state.subtree(location.id).contains(&new_parent.id) {
            return Err(StoreError::invalid_argument(
                "new_parent",
                format!(
                    "Cannot move location {} into its own subtree",
                    location.id
                ),
            ));
        }

        let record = state
            .locations
            .get_mut(&location.id)
            .ok_or_else(|| StoreError::not_found("Location", location.id))?;
        record.parent_location_id = Some(new_parent.id);
        Ok(())
    }

    async fn swap_location(&self, location1: &Location, location2: &Location) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let content1 = state.record(location1.id)?.content_id;
        let content2 = state.record(location2.id)?.content_id;
        if content1 == content2 {
            return Ok(());
        }

        if let Some(record) = state.locations.get_mut(&location1.id) {
            record.content_id = content2;
        }
        if let Some(record) = state.locations.get_mut(&location2.id) {
            record.content_id = content1;
        }

        if let Some(info) = state.contents.get_mut(&content1) {
            if info.main_location_id == Some(location1.id) {
                info.main_location_id = Some(location2.id);
            }
        }
        if let Some(info) = state.contents.get_mut(&content2) {
            if info.main_location_id == Some(location2.id) {
                info.main_location_id = Some(location1.id);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl TrashStore for InMemoryRepository {
    async fn trash(&self, location: &Location) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let parent_id = state.record(location.id)?.parent_location_id.ok_or_else(|| {
            StoreError::invalid_argument("location", "The top of the tree cannot be trashed")
        })?;
        state.ensure_removable(location, "trash")?;

        let records = state.detach_subtree(location.id, false);
        state.trash.push(TrashItem {
            location_id: location.id,
            original_parent_location_id: parent_id,
            subtree_size: records.len(),
            records,
        });
        Ok(())
    }
}

#[async_trait]
impl ContentStore for InMemoryRepository {
    async fn copy_content(
        &self,
        content_info: &ContentInfo,
        request: LocationCreateRequest,
    ) -> StoreResult<Content> {
        let mut state = self.state.write().await;
        state.record(request.parent_location_id)?;
        let source = state.content(content_info.id)?.clone();

        let content_id = state.next_content_id;
        state.next_content_id += 1;

        let location_id = state.insert_location(content_id, &request);
        let copy = ContentInfo::new(
            content_id,
            source.content_type_id,
            source.name,
            Some(location_id),
        );
        state.contents.insert(content_id, copy.clone());

        Ok(Content { content_info: copy })
    }
}

#[async_trait]
impl ContentTypeStore for InMemoryRepository {
    async fn load_content_type(&self, id: ContentTypeId) -> StoreResult<ContentType> {
        self.state
            .read()
            .await
            .content_types
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("ContentType", id))
    }
}

#[async_trait]
impl PermissionResolver for InMemoryRepository {
    async fn can_manage_locations(&self, content_info: &ContentInfo) -> StoreResult<bool> {
        Ok(!self
            .state
            .read()
            .await
            .manage_denied
            .contains(&content_info.id))
    }

    async fn can_remove_content(
        &self,
        content_info: &ContentInfo,
        _location: &Location,
    ) -> StoreResult<bool> {
        Ok(!self
            .state
            .read()
            .await
            .remove_denied
            .contains(&content_info.id))
    }
}

#[async_trait]
impl PathResolver for InMemoryRepository {
    async fn load_path_locations(&self, location: &Location) -> StoreResult<Vec<Location>> {
        let state = self.state.read().await;
        state
            .ancestry(location.id)?
            .into_iter()
            .map(|id| state.build_location(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn article_type(repository: &InMemoryRepository) -> ContentTypeId {
        repository.add_content_type("article", false).await
    }

    #[tokio::test]
    async fn test_seeded_root() {
        let repository = InMemoryRepository::new();
        let root = repository.load_location(ROOT_LOCATION_ID).await.unwrap();

        assert_eq!(root.parent_location_id, None);
        assert_eq!(root.content_id(), ROOT_CONTENT_ID);
        assert_eq!(root.depth, 0);
        assert_eq!(root.path_string, "/1/");
        assert!(root.is_main());
    }

    #[tokio::test]
    async fn test_create_content_builds_path() {
        let repository = InMemoryRepository::new();
        let folder = repository
            .create_content("Folder", FOLDER_CONTENT_TYPE_ID, ROOT_LOCATION_ID)
            .await
            .unwrap();
        let article = repository
            .create_content("Article", article_type(&repository).await, folder.id)
            .await
            .unwrap();

        assert_eq!(article.depth, 2);
        assert_eq!(article.path_string, format!("/1/{}/{}/", folder.id, article.id));

        let path = repository.load_path_locations(&article).await.unwrap();
        let ids: Vec<_> = path.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![ROOT_LOCATION_ID, folder.id, article.id]);
    }

    #[tokio::test]
    async fn test_delete_removes_subtree_and_orphaned_content() {
        let repository = InMemoryRepository::new();
        let folder = repository
            .create_content("Folder", FOLDER_CONTENT_TYPE_ID, ROOT_LOCATION_ID)
            .await
            .unwrap();
        let article = repository
            .create_content("Article", article_type(&repository).await, folder.id)
            .await
            .unwrap();

        repository.delete_location(&folder).await.unwrap();

        assert!(matches!(
            repository.load_location(article.id).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(repository.content_info(article.content_id()).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_reassigns_main_location() {
        let repository = InMemoryRepository::new();
        let article = repository
            .create_content("Article", article_type(&repository).await, ROOT_LOCATION_ID)
            .await
            .unwrap();
        let second = repository
            .create_location(
                &article.content_info,
                LocationCreateRequest::new(ROOT_LOCATION_ID),
            )
            .await
            .unwrap();

        repository.delete_location(&article).await.unwrap();

        let info = repository.content_info(article.content_id()).await.unwrap();
        assert_eq!(info.main_location_id, Some(second.id));
    }

    #[tokio::test]
    async fn test_trash_and_restore() {
        let repository = InMemoryRepository::new();
        let article = repository
            .create_content("Article", article_type(&repository).await, ROOT_LOCATION_ID)
            .await
            .unwrap();

        repository.trash(&article).await.unwrap();

        let info = repository.content_info(article.content_id()).await.unwrap();
        assert_eq!(info.main_location_id, None);
        assert_eq!(repository.trashed().await.len(), 1);

        let restored = repository.restore(article.id).await.unwrap();
        assert_eq!(restored.id, article.id);
        assert!(restored.is_main());
        assert!(repository.trashed().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_keeps_content_with_trashed_location_restorable() {
        let repository = InMemoryRepository::new();
        let article = repository
            .create_content("Article", article_type(&repository).await, ROOT_LOCATION_ID)
            .await
            .unwrap();
        let second = repository
            .create_location(
                &article.content_info,
                LocationCreateRequest::new(ROOT_LOCATION_ID),
            )
            .await
            .unwrap();

        repository.trash(&article).await.unwrap();
        repository.delete_location(&second).await.unwrap();

        let info = repository.content_info(article.content_id()).await.unwrap();
        assert_eq!(info.main_location_id, None);

        let restored = repository.restore(article.id).await.unwrap();
        assert_eq!(restored.content_id(), article.content_id());
        assert!(restored.is_main());
        assert!(repository.trashed().await.is_empty());
        assert!(repository.load_location(article.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_restore_leaves_trash_and_tree_untouched() {
        let repository = InMemoryRepository::new();
        let folder = repository
            .create_content("Folder", FOLDER_CONTENT_TYPE_ID, ROOT_LOCATION_ID)
            .await
            .unwrap();
        let article = repository
            .create_content("Article", article_type(&repository).await, folder.id)
            .await
            .unwrap();
        repository.trash(&article).await.unwrap();
        repository.delete_location(&folder).await.unwrap();

        let result = repository.restore(article.id).await;

        assert!(matches!(result, Err(StoreError::NotFound { .. })));
        assert_eq!(repository.trashed().await.len(), 1);
        assert!(repository.load_location(article.id).await.is_err());
        let root = repository.load_location(ROOT_LOCATION_ID).await.unwrap();
        assert_eq!(repository.get_location_child_count(&root).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_trash_denied() {
        let repository = InMemoryRepository::new();
        let article = repository
            .create_content("Article", article_type(&repository).await, ROOT_LOCATION_ID)
            .await
            .unwrap();
        repository.deny_remove(article.content_id()).await;

        let result = repository.trash(&article).await;
        assert!(matches!(result, Err(StoreError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_move_into_own_subtree_rejected() {
        let repository = InMemoryRepository::new();
        let folder = repository
            .create_content("Folder", FOLDER_CONTENT_TYPE_ID, ROOT_LOCATION_ID)
            .await
            .unwrap();
        let child = repository
            .create_content("Child", FOLDER_CONTENT_TYPE_ID, folder.id)
            .await
            .unwrap();

        let result = repository.move_subtree(&folder, &child).await;
        assert!(matches!(result, Err(StoreError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn test_swap_exchanges_content_and_main_locations() {
        let repository = InMemoryRepository::new();
        let article_type = article_type(&repository).await;
        let first = repository
            .create_content("First", article_type, ROOT_LOCATION_ID)
            .await
            .unwrap();
        let second = repository
            .create_content("Second", article_type, ROOT_LOCATION_ID)
            .await
            .unwrap();

        repository.swap_location(&first, &second).await.unwrap();

        let reloaded = repository.load_location(first.id).await.unwrap();
        assert_eq!(reloaded.content_id(), second.content_id());
        assert!(reloaded.is_main());

        let first_info = repository.content_info(first.content_id()).await.unwrap();
        assert_eq!(first_info.main_location_id, Some(second.id));
    }

    #[tokio::test]
    async fn test_copy_creates_new_content() {
        let repository = InMemoryRepository::new();
        let article = repository
            .create_content("Article", article_type(&repository).await, ROOT_LOCATION_ID)
            .await
            .unwrap();

        let copy = repository
            .copy_content(
                &article.content_info,
                LocationCreateRequest::new(ROOT_LOCATION_ID),
            )
            .await
            .unwrap();

        assert_ne!(copy.content_info.id, article.content_id());
        assert_ne!(copy.content_info.main_location_id, Some(article.id));
        assert_eq!(copy.content_info.name, "Article");
    }
}
