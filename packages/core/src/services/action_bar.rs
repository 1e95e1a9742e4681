//! Action Bar Operations
//!
//! The admin action bar shows buttons for the location being viewed. Each
//! button submits a small confirmation form; this module turns a submitted
//! form into an orchestrator call and tells the caller which location to
//! redirect to afterwards.

use crate::models::{Location, LocationId};
use crate::services::error::LocationServiceError;
use crate::services::location_orchestrator::LocationOrchestrator;
use serde::{Deserialize, Serialize};

/// Submitted trash confirmation form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrashLocationForm {
    /// Location the form was rendered for
    pub location_id: Option<LocationId>,

    /// Whether the user confirmed the action
    pub confirmed: bool,
}

impl TrashLocationForm {
    pub fn confirmed_for(location_id: LocationId) -> Self {
        Self {
            location_id: Some(location_id),
            confirmed: true,
        }
    }

    /// A form is valid when it was confirmed for exactly this location
    pub fn is_valid_for(&self, location: &Location) -> bool {
        self.confirmed && self.location_id == Some(location.id)
    }
}

/// Action bar handlers
#[derive(Clone)]
pub struct ActionBar {
    orchestrator: LocationOrchestrator,
}

impl ActionBar {
    pub fn new(orchestrator: LocationOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Handle the trash button
    ///
    /// Returns the location to redirect to: the parent after a successful
    /// trash, or `location` itself when the form is not valid.
    ///
    /// # Errors
    ///
    /// Any error from trashing a location with a valid form
    pub async fn trash_location(
        &self,
        location: &Location,
        form: &TrashLocationForm,
    ) -> Result<Location, LocationServiceError> {
        if !form.is_valid_for(location) {
            tracing::debug!(
                "Ignoring invalid trash form for location {} (form: {:?})",
                location.id,
                form
            );
            return Ok(location.clone());
        }

        self.orchestrator
            .trash_location_and_return_parent(location)
            .await
    }
}
