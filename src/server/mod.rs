//! HTTP layer
//!
//! `ServerBuilder` wires a [`CinemaStore`](crate::core::CinemaStore) and a
//! [`TokenValidator`](crate::core::TokenValidator) into an axum router
//! exposing the cinema routes plus health checks.

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::{ApiResponse, AppState};
pub use router::build_router;
