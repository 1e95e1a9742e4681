//! Shared helpers for integration tests

use anyhow::Result;
use locus_core::db::{InMemoryRepository, FOLDER_CONTENT_TYPE_ID, ROOT_LOCATION_ID};
use locus_core::models::{ContentTypeId, Location};
use locus_core::{LocationOrchestrator, LocationServiceConfig, LocationServiceDeps};
use std::sync::Arc;

/// Test environment: a repository seeded with a small tree and an orchestrator over it
///
/// ```text
/// Home (1)
/// ├── Media (folder)
/// │   └── Logo (article)
/// ├── Blog (folder)
/// └── About (article)
/// ```
#[allow(dead_code)]
pub struct TestEnv {
    pub repository: Arc<InMemoryRepository>,
    pub orchestrator: LocationOrchestrator,
    pub article_type: ContentTypeId,
    pub media: Location,
    pub logo: Location,
    pub blog: Location,
    pub about: Location,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub async fn create_test_env() -> Result<TestEnv> {
    init_tracing();

    let repository = Arc::new(InMemoryRepository::new());
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

    let orchestrator = LocationOrchestrator::new(
        LocationServiceDeps::from_repository(repository.clone()),
        LocationServiceConfig::default(),
    )?;

    Ok(TestEnv {
        repository,
        orchestrator,
        article_type,
        media,
        logo,
        blog,
        about,
    })
}
