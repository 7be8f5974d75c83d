//! # Cines API
//!
//! A multi-tenant cinema locations API. Each cinema belongs to a tenant and
//! is addressed by a composite location key such as
//! `Peru#Lima#Lima#Miraflores`, so a location search is a prefix query on a
//! single partition.
//!
//! ## Features
//!
//! - **Search / Create / Update** over HTTP, with the same logic usable
//!   directly through [`CinemaService`](core::CinemaService)
//! - **Delegated token checks**: every request is approved by a
//!   [`TokenValidator`](core::TokenValidator) before any store access
//! - **Pluggable storage**: in-memory for development, DynamoDB behind the
//!   `dynamodb` feature
//! - **Typed errors** mapped to stable HTTP status codes and error codes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cines::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_store(InMemoryCinemaStore::new())
//!         .with_validator(StaticTokenValidator::new().allow("dev-token"))
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod authorizer;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthDecision, StaticTokenValidator, TokenCheck, TokenValidator},
        error::{CinemaError, CinemaResult, ConfigError, ErrorResponse},
        location::{LocationPath, ScanPredicates},
        record::{CinemaPatch, CinemaRecord},
        request::{CreateRequest, SearchRequest, UpdateRequest},
        service::CinemaService,
        store::CinemaStore,
    };

    // === Storage ===
    pub use crate::storage::InMemoryCinemaStore;
    #[cfg(feature = "dynamodb")]
    pub use crate::storage::DynamoDBCinemaStore;

    // === Token validators ===
    pub use crate::authorizer::build_validator;
    #[cfg(feature = "http-authorizer")]
    pub use crate::authorizer::HttpTokenValidator;
    #[cfg(feature = "lambda-authorizer")]
    pub use crate::authorizer::LambdaTokenValidator;

    // === Config ===
    pub use crate::config::{AppConfig, ValidatorTarget};

    // === Server ===
    pub use crate::server::{ApiResponse, AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
