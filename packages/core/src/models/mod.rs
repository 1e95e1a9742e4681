//! Data Models
//!
//! This module contains the repository values used throughout Locus:
//!
//! - `Location` - a placement of content in the content tree
//! - `ContentInfo`, `ContentType`, `Content` - content metadata
//! - `UiLocation` - a location decorated for admin screens

mod location;

pub use location::{
    Content, ContentId, ContentInfo, ContentType, ContentTypeId, Location, LocationCreateRequest,
    LocationId, UiLocation,
};
