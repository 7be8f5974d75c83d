//! Standalone HTTP server
//!
//! Reads its settings from the environment (see [`AppConfig::from_env`]).
//! With the `dynamodb` feature the records live in the configured table;
//! otherwise they are kept in memory for the lifetime of the process.

use cines::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let validator = build_validator(&config.validator_target()).await?;

    let builder = ServerBuilder::new()
        .with_validator_arc(validator)
        .with_config(&config);

    #[cfg(feature = "dynamodb")]
    let builder = {
        tracing::info!(table = %config.table_name, "using DynamoDB store");
        builder.with_store(DynamoDBCinemaStore::from_env(config.table_name.clone()).await)
    };

    #[cfg(not(feature = "dynamodb"))]
    let builder = {
        tracing::warn!(table = %config.table_name, "dynamodb feature disabled, using in-memory store");
        builder.with_store(InMemoryCinemaStore::new())
    };

    builder.serve(&config.bind_address).await
}
