//! Typed error handling for the cinema locations API
//!
//! Every operation funnels its failures into [`CinemaError`], which knows its
//! HTTP status and a stable error code. Backend failures (store, token
//! delegate, configuration) are flattened into `Internal` / `Config`: the
//! original message is logged for operators and never sent to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! match service.update(authorization, request).await {
//!     Ok(record) => println!("updated {}", record.location_key),
//!     Err(CinemaError::NotFound { location_key, .. }) => {
//!         println!("nothing stored at {}", location_key);
//!     }
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use crate::core::location::InvalidSegment;
use crate::core::validation::FieldCheck;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Generic phrase returned for any unclassified failure
pub const INTERNAL_MESSAGE: &str = "Internal Server Error - an unexpected error occurred";

/// The main error type of the API
#[derive(Debug, thiserror::Error)]
pub enum CinemaError {
    /// No `Authorization` value on the request
    #[error("Unauthorized - missing authorization token")]
    Unauthorized,

    /// The token delegate denied access
    #[error("Forbidden - access not authorized")]
    Forbidden,

    /// Required fields are missing or blank
    #[error("Bad Request - missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// A field is present but unusable
    #[error("Bad Request - invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// Update request with nothing to set
    #[error("Bad Request - no fields supplied to update")]
    NothingToUpdate,

    /// No record at the addressed key
    #[error("Not Found - no cinema at '{location_key}' for tenant '{tenant_id}'")]
    NotFound {
        tenant_id: String,
        location_key: String,
    },

    /// Missing or invalid process configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any unclassified failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors related to configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Required setting absent or blank
    #[error("Missing required setting '{field}' ({source_hint})")]
    MissingField { field: String, source_hint: String },

    /// Setting present but unusable
    #[error("Invalid value '{value}' for setting '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Failed to parse a configuration document
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CinemaError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CinemaError::Unauthorized => StatusCode::UNAUTHORIZED,
            CinemaError::Forbidden => StatusCode::FORBIDDEN,
            CinemaError::MissingFields { .. }
            | CinemaError::InvalidField { .. }
            | CinemaError::NothingToUpdate => StatusCode::BAD_REQUEST,
            CinemaError::NotFound { .. } => StatusCode::NOT_FOUND,
            CinemaError::Config(_) | CinemaError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CinemaError::Unauthorized => "UNAUTHORIZED",
            CinemaError::Forbidden => "FORBIDDEN",
            CinemaError::MissingFields { .. } => "MISSING_FIELDS",
            CinemaError::InvalidField { .. } => "INVALID_FIELD",
            CinemaError::NothingToUpdate => "NOTHING_TO_UPDATE",
            CinemaError::NotFound { .. } => "CINEMA_NOT_FOUND",
            CinemaError::Config(_) => "CONFIG_ERROR",
            CinemaError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the real message must stay server-side
    pub fn is_internal(&self) -> bool {
        matches!(self, CinemaError::Config(_) | CinemaError::Internal(_))
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            INTERNAL_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            CinemaError::MissingFields { fields } => {
                Some(serde_json::json!({ "fields": fields }))
            }
            CinemaError::InvalidField { field, .. } => {
                Some(serde_json::json!({ "field": field }))
            }
            CinemaError::NotFound {
                tenant_id,
                location_key,
            } => Some(serde_json::json!({
                "tenant_id": tenant_id,
                "ordenamiento": location_key
            })),
            _ => None,
        }
    }

    /// Build from a failed required-field check
    ///
    /// Returns `None` when the check passed.
    pub fn from_field_check(check: FieldCheck) -> Option<Self> {
        match check {
            FieldCheck::Valid => None,
            FieldCheck::MissingFields(fields) => Some(CinemaError::MissingFields { fields }),
        }
    }
}

impl IntoResponse for CinemaError {
    fn into_response(self) -> Response {
        if self.is_internal() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<InvalidSegment> for CinemaError {
    fn from(err: InvalidSegment) -> Self {
        CinemaError::InvalidField {
            field: err.field.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CinemaError {
    fn from(err: serde_json::Error) -> Self {
        CinemaError::Internal(format!("serialization failed: {}", err))
    }
}

/// Store and delegate backends report through `anyhow`
impl From<anyhow::Error> for CinemaError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<CinemaError>() {
            Ok(cinema_err) => cinema_err,
            Err(err) => CinemaError::Internal(format!("{:#}", err)),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for API operations
pub type CinemaResult<T> = Result<T, CinemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CinemaError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(CinemaError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(CinemaError::NothingToUpdate.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CinemaError::NotFound {
                tenant_id: "t1".into(),
                location_key: "Lima#Lima#Surco".into(),
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CinemaError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_fields_display_lists_every_field() {
        let err = CinemaError::MissingFields {
            fields: vec!["nombre".into(), "direccion".into()],
        };
        let display = err.to_string();
        assert!(display.contains("nombre"));
        assert!(display.contains("direccion"));
        assert_eq!(err.error_code(), "MISSING_FIELDS");
    }

    #[test]
    fn test_internal_message_is_not_exposed() {
        let err = CinemaError::Internal("connection reset by peer".into());
        let response = err.to_response();
        assert_eq!(response.code, "INTERNAL_ERROR");
        assert_eq!(response.message, INTERNAL_MESSAGE);
        assert!(!response.message.contains("connection reset"));

        let err = CinemaError::Config(ConfigError::MissingField {
            field: "table_name".into(),
            source_hint: "TABLE_NAME_CINES".into(),
        });
        assert_eq!(err.to_response().message, INTERNAL_MESSAGE);
    }

    #[test]
    fn test_not_found_details() {
        let err = CinemaError::NotFound {
            tenant_id: "t1".into(),
            location_key: "Lima#Lima#Surco".into(),
        };
        let details = err.to_response().details.unwrap();
        assert_eq!(details["ordenamiento"], "Lima#Lima#Surco");
    }

    #[test]
    fn test_from_anyhow_keeps_typed_error() {
        let err: CinemaError = anyhow::Error::new(CinemaError::Forbidden).into();
        assert!(matches!(err, CinemaError::Forbidden));

        let err: CinemaError = anyhow::anyhow!("throttled").into();
        assert!(matches!(err, CinemaError::Internal(msg) if msg.contains("throttled")));
    }

    #[test]
    fn test_from_invalid_segment() {
        let err: CinemaError = InvalidSegment {
            field: "provincia",
            value: "a#b".into(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_FIELD");
    }

    #[test]
    fn test_from_field_check() {
        assert!(CinemaError::from_field_check(FieldCheck::Valid).is_none());
        let err = CinemaError::from_field_check(FieldCheck::MissingFields(vec!["tenant_id".into()]));
        assert!(matches!(err, Some(CinemaError::MissingFields { .. })));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ParseError {
            file: Some("cines.yaml".into()),
            message: "bad indent".into(),
        };
        assert!(err.to_string().contains("cines.yaml"));
    }
}
