//! Location Data Structures
//!
//! This module defines the repository values the orchestrator works with:
//!
//! - `Location` - one placement of a content item in the content tree
//! - `ContentInfo` - location-independent metadata of a content item
//! - `ContentType` - content type metadata (only container-ness matters here)
//! - `UiLocation` - a `Location` decorated with admin UI properties
//!
//! A content item may be placed at several locations. Exactly one of them is
//! the main location, referenced by `ContentInfo::main_location_id`.
//!
//! # Examples
//!
//! ```rust
//! use locus_core::models::{ContentInfo, Location};
//!
//! let info = ContentInfo::new(42, 2, "Article", Some(7));
//! let location = Location::new(7, Some(2), info);
//!
//! assert!(location.is_main());
//! assert_eq!(location.content_id(), 42);
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a location in the content tree
pub type LocationId = i64;

/// Identifier of a content item
pub type ContentId = i64;

/// Identifier of a content type
pub type ContentTypeId = i64;

/// Location-independent metadata of a content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentInfo {
    pub id: ContentId,

    pub content_type_id: ContentTypeId,

    /// Display name of the content item
    pub name: String,

    /// Main location of the content (None while the content has no location)
    pub main_location_id: Option<LocationId>,
}

impl ContentInfo {
    pub fn new(
        id: ContentId,
        content_type_id: ContentTypeId,
        name: impl Into<String>,
        main_location_id: Option<LocationId>,
    ) -> Self {
        Self {
            id,
            content_type_id,
            name: name.into(),
            main_location_id,
        }
    }
}

/// Content type metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    pub id: ContentTypeId,

    /// Machine name (e.g., "folder", "article")
    pub identifier: String,

    /// Whether locations of this type may have child locations
    pub is_container: bool,
}

impl ContentType {
    pub fn new(id: ContentTypeId, identifier: impl Into<String>, is_container: bool) -> Self {
        Self {
            id,
            identifier: identifier.into(),
            is_container,
        }
    }
}

/// A content item as returned by content operations (e.g., copy)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub content_info: ContentInfo,
}

/// A placement of a content item in the content tree
///
/// # Fields
///
/// - `id`: Location identifier
/// - `parent_location_id`: Parent location (None only for the top of the tree)
/// - `content_info`: The content placed here, as of load time
/// - `depth`: Number of ancestors above this location
/// - `path_string`: Materialized path of ids, e.g. `/1/2/7/`
/// - `hidden`: Whether the location is hidden from public listings
/// - `priority`: Sort priority among siblings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,

    pub parent_location_id: Option<LocationId>,

    pub content_info: ContentInfo,

    #[serde(default)]
    pub depth: u32,

    #[serde(default)]
    pub path_string: String,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub priority: i32,
}

impl Location {
    /// Create a visible location with default priority
    ///
    /// `depth` and `path_string` are left empty; stores fill them in on load.
    pub fn new(
        id: LocationId,
        parent_location_id: Option<LocationId>,
        content_info: ContentInfo,
    ) -> Self {
        Self {
            id,
            parent_location_id,
            content_info,
            depth: 0,
            path_string: String::new(),
            hidden: false,
            priority: 0,
        }
    }

    pub fn content_id(&self) -> ContentId {
        self.content_info.id
    }

    /// Whether this location is the main location of its content
    pub fn is_main(&self) -> bool {
        self.content_info.main_location_id == Some(self.id)
    }
}

/// Parameters for placing content under a parent location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCreateRequest {
    pub parent_location_id: LocationId,
    pub hidden: bool,
    pub priority: i32,
}

impl LocationCreateRequest {
    pub fn new(parent_location_id: LocationId) -> Self {
        Self {
            parent_location_id,
            hidden: false,
            priority: 0,
        }
    }
}

/// A location decorated with the properties admin screens need
///
/// Derived on every load and never persisted. The wrapped location is
/// flattened on serialization, so the UI sees one object carrying both the
/// location fields and `childCount`, `pathLocations`, `userCanManage`,
/// `userCanRemove` and `main`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiLocation {
    #[serde(flatten)]
    pub location: Location,

    /// Number of direct children
    pub child_count: usize,

    /// Ancestor chain, top of the tree first
    pub path_locations: Vec<Location>,

    /// Whether the current user may add or manage locations of the content
    pub user_can_manage: bool,

    /// Whether the current user may remove the content from this location
    pub user_can_remove: bool,

    /// Whether this is the main location of the content
    pub main: bool,
}

impl UiLocation {
    pub fn id(&self) -> LocationId {
        self.location.id
    }
}
