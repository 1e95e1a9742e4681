//! Locus Dev Locations Walkthrough
//!
//! Seeds an in-memory repository with a small content tree, runs the action
//! bar operations against it through `LocationOrchestrator`, and prints the
//! decorated locations the admin UI would receive as JSON.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run -p locus-dev-tools --bin dev-locations
//! ```
//!
//! # Environment
//!
//! - `RUST_LOG` - log filter (default `info`)
//! - `LOCUS_ROOT_CONTENT_ID` - content id treated as the tree root (default 1)

use std::env;
use std::sync::Arc;

use locus_core::db::{InMemoryRepository, FOLDER_CONTENT_TYPE_ID, ROOT_LOCATION_ID};
use locus_core::{LocationOrchestrator, LocationServiceConfig, LocationServiceDeps};

fn config_from_env() -> anyhow::Result<LocationServiceConfig> {
    let mut config = LocationServiceConfig::default();

    if let Ok(value) = env::var("LOCUS_ROOT_CONTENT_ID") {
        config.root_content_id = value
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid LOCUS_ROOT_CONTENT_ID '{}': {}", value, e))?;
    }
    config.client_id = Some(format!("dev-locations-{}", uuid::Uuid::new_v4()));

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config_from_env()?;
    tracing::info!("Root content id: {}", config.root_content_id);

    let repository = Arc::new(InMemoryRepository::new());
    let orchestrator = LocationOrchestrator::new(
        LocationServiceDeps::from_repository(repository.clone()),
        config,
    )?;

    let mut events = orchestrator.subscribe_to_events();
    let event_logger = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::info!("Event {}: {:?}", event.event_type(), event.change);
        }
    });

    // Seed: Home > {Media > Logo, Blog, About}
    let article_type = repository.add_content_type("article", false).await;
    let media = repository
        .create_content("Media", FOLDER_CONTENT_TYPE_ID, ROOT_LOCATION_ID)
        .await?;
    let logo = repository
        .create_content("Logo", article_type, media.id)
        .await?;
    let blog = repository
        .create_content("Blog", FOLDER_CONTENT_TYPE_ID, ROOT_LOCATION_ID)
        .await?;
    let about = repository
        .create_content("About", article_type, ROOT_LOCATION_ID)
        .await?;

    orchestrator
        .add_location(&logo.content_info, blog.id)
        .await?;
    let copy = orchestrator.copy_location(&about, blog.id).await?;
    tracing::info!("Copied '{}' to location {}", about.content_info.name, copy.id);

    match orchestrator.move_location(&blog, about.id).await {
        Ok(_) => tracing::warn!("Unexpected: moved under a non-container"),
        Err(e) => tracing::info!("Move rejected as expected: {}", e),
    }

    let parent = orchestrator.trash_location_and_return_parent(&logo).await?;
    tracing::info!("Trashed location {}, redirecting to {}", logo.id, parent.id);

    let logo_info = repository.content_info(logo.content_id()).await?;
    let ui_locations = orchestrator.load_locations(&logo_info).await?;
    println!("{}", serde_json::to_string_pretty(&ui_locations)?);

    drop(orchestrator);
    event_logger.await?;

    Ok(())
}
