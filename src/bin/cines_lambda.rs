//! Lambda entrypoint
//!
//! The router is built once per execution environment and reused across
//! invocations, so the SDK clients are shared between requests.

use cines::prelude::*;
use lambda_http::{Error as LambdaError, run};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        table = %config.table_name,
        allow_scan = config.allow_scan,
        "initialising Lambda runtime"
    );

    let validator = build_validator(&config.validator_target()).await?;
    let store = DynamoDBCinemaStore::from_env(config.table_name.clone()).await;

    let app = ServerBuilder::new()
        .with_store(store)
        .with_validator_arc(validator)
        .with_config(&config)
        .build()
        .map_err(|e| LambdaError::from(format!("failed to build router: {e:#}")))?;

    run(app).await
}
