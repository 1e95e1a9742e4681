//! Domain Events for Location Mutations
//!
//! This module defines the events emitted by the location orchestrator after
//! a tree mutation completed in the store. Other parts of the system (cache
//! invalidation, live admin views) subscribe to these events without coupling
//! to the orchestrator.
//!
//! # Architecture
//!
//! Events are emitted using tokio's broadcast channel, allowing multiple
//! subscribers to receive notifications asynchronously. Events are only sent
//! for mutations that succeeded; a rejected or failed operation emits nothing.

use crate::models::{ContentId, LocationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The tree mutation an event reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LocationChange {
    /// Content was placed at an additional location
    #[serde(rename = "location:created", rename_all = "camelCase")]
    Created {
        location_id: LocationId,
        content_id: ContentId,
        parent_location_id: LocationId,
    },

    /// A location (and its subtree) was permanently deleted
    #[serde(rename = "location:deleted", rename_all = "camelCase")]
    Deleted { location_id: LocationId },

    /// A location (and its subtree) was moved to the trash
    #[serde(rename = "location:trashed", rename_all = "camelCase")]
    Trashed {
        location_id: LocationId,
        parent_location_id: LocationId,
    },

    /// A subtree was moved under a new parent
    #[serde(rename = "location:moved", rename_all = "camelCase")]
    Moved {
        location_id: LocationId,
        new_parent_location_id: LocationId,
    },

    /// The content of two locations was exchanged
    #[serde(rename = "location:swapped", rename_all = "camelCase")]
    Swapped {
        location_id: LocationId,
        other_location_id: LocationId,
    },

    /// A content item was copied to a new location
    #[serde(rename = "location:copied", rename_all = "camelCase")]
    Copied {
        source_location_id: LocationId,
        copy_location_id: LocationId,
    },
}

impl LocationChange {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            LocationChange::Created { .. } => "location:created",
            LocationChange::Deleted { .. } => "location:deleted",
            LocationChange::Trashed { .. } => "location:trashed",
            LocationChange::Moved { .. } => "location:moved",
            LocationChange::Swapped { .. } => "location:swapped",
            LocationChange::Copied { .. } => "location:copied",
        }
    }
}

/// Event envelope sent on the broadcast channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationEvent {
    #[serde(flatten)]
    pub change: LocationChange,

    /// Client that triggered the mutation, so it can skip its own events
    pub source_client_id: Option<String>,

    pub occurred_at: DateTime<Utc>,
}

impl LocationEvent {
    pub fn new(change: LocationChange, source_client_id: Option<String>) -> Self {
        Self {
            change,
            source_client_id,
            occurred_at: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.change.event_type()
    }
}
