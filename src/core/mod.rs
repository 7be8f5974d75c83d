//! Core module containing the domain types, traits and operations

pub mod auth;
pub mod error;
pub mod location;
pub mod record;
pub mod request;
pub mod service;
pub mod store;
pub mod validation;

pub use auth::{AuthDecision, StaticTokenValidator, TokenCheck, TokenValidator};
pub use error::{CinemaError, CinemaResult, ConfigError, ErrorResponse};
pub use location::{LocationPath, ScanPredicates, build_key};
pub use record::{CinemaPatch, CinemaRecord};
pub use request::{CreateRequest, SearchRequest, UpdateRequest};
pub use service::CinemaService;
pub use store::CinemaStore;
pub use validation::{FieldCheck, RequiredFields};
