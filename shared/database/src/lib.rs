//! Storage for quality-control records.
//!
//! [`DocumentRepository`] is the seam between the HTTP layer and storage.
//! [`MongoRepository`] is what runs in production; [`InMemoryRepository`]
//! backs the tests. [`DocumentService`] puts validation and edit merging in
//! front of either.

pub mod mongodb;
pub mod repositories;
pub mod service;

pub use self::mongodb::{create_mongo_client, get_database, health_check, MongoClient, MongoDatabase};
pub use repositories::*;
pub use service::DocumentService;

use anyhow::Result;
use flexiflo_utils::DatabaseConfig;
use std::time::Duration;

/// Connects using the configured URL and returns the database to store in.
/// Fails when no URL is configured or the server does not answer.
pub async fn initialize_database(config: &DatabaseConfig) -> Result<(MongoClient, MongoDatabase)> {
    let url = config.require_url()?;
    let client = create_mongo_client(
        url,
        Duration::from_secs(config.connection_timeout_seconds),
    )
    .await?;
    let database = get_database(&client, &config.database_name);
    tracing::info!(database = %database.name(), "Using MongoDB database");
    Ok((client, database))
}
