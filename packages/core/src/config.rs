//! Configuration for the location orchestrator

use serde::{Deserialize, Serialize};

/// Upper bound for the event channel capacity
const MAX_EVENT_CHANNEL_CAPACITY: usize = 65_536;

/// Configuration for `LocationOrchestrator`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocationServiceConfig {
    /// Content id placed at the top of the tree; its locations are never removed or moved
    pub root_content_id: i64,

    /// Capacity of the broadcast channel carrying location events
    pub event_channel_capacity: usize,

    /// Client identifier stamped on emitted events (e.g., "admin-ui")
    pub client_id: Option<String>,
}

impl Default for LocationServiceConfig {
    fn default() -> Self {
        Self {
            root_content_id: 1,
            event_channel_capacity: 128,
            client_id: None,
        }
    }
}

impl LocationServiceConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.root_content_id <= 0 {
            return Err("root_content_id must be a positive content id".to_string());
        }

        if self.event_channel_capacity == 0 {
            return Err("event_channel_capacity must be greater than 0".to_string());
        }

        if self.event_channel_capacity > MAX_EVENT_CHANNEL_CAPACITY {
            return Err(format!(
                "event_channel_capacity cannot exceed {}",
                MAX_EVENT_CHANNEL_CAPACITY
            ));
        }

        if let Some(client_id) = &self.client_id {
            if client_id.trim().is_empty() {
                return Err("client_id cannot be blank".to_string());
            }
        }

        Ok(())
    }
}
