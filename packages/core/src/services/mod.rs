//! Business Services
//!
//! This module contains the location management services used by admin
//! screens:
//!
//! - `LocationOrchestrator` - decorated location loading, permission checks
//!   and validated tree mutations
//! - `ActionBar` - confirmation-form handling for action bar buttons
//!
//! Services coordinate between the repository collaborators and the UI layer,
//! enforcing placement rules the repository does not guarantee itself.

pub mod action_bar;
pub mod error;
pub mod location_orchestrator;

pub use action_bar::{ActionBar, TrashLocationForm};
pub use error::LocationServiceError;
pub use location_orchestrator::{
    prioritize_main_location, LocationOrchestrator, LocationServiceDeps,
};
