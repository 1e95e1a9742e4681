//! Locus Core Location Management Layer
//!
//! This crate provides the location orchestration behind the content
//! repository admin screens: loading locations decorated for display and
//! mediating tree mutations (trash, delete, add, move, copy, swap) while
//! enforcing placement and permission rules.
//!
//! # Architecture
//!
//! - **Injected collaborators**: Every repository service is a trait object
//!   handed to the orchestrator at construction
//! - **Validate before mutate**: Placement violations are rejected before any
//!   mutating repository call
//! - **Derived decoration**: UI properties are recomputed on every load and
//!   never persisted
//!
//! # Modules
//!
//! - [`models`] - Repository values (Location, ContentInfo, UiLocation, etc.)
//! - [`db`] - Collaborator traits, store errors, events, in-memory repository
//! - [`services`] - LocationOrchestrator and ActionBar
//! - [`config`] - Orchestrator configuration

pub mod config;
pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::LocationServiceConfig;
pub use models::*;
pub use services::*;
