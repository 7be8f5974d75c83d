//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Internal details never reach the caller
//! - Error conversions work correctly

use axum::http::StatusCode;
use axum::response::IntoResponse;
use cines::prelude::*;

fn not_found() -> CinemaError {
    CinemaError::NotFound {
        tenant_id: "t1".to_string(),
        location_key: "Lima#Lima#Surco".to_string(),
    }
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_unauthorized_returns_401() {
        assert_eq!(CinemaError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_returns_403() {
        assert_eq!(CinemaError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_field_problems_return_400() {
        let errors = [
            CinemaError::MissingFields {
                fields: vec!["nombre".to_string()],
            },
            CinemaError::InvalidField {
                field: "distrito".to_string(),
                message: "contains '#'".to_string(),
            },
            CinemaError::NothingToUpdate,
        ];
        for err in errors {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{}", err);
        }
    }

    #[test]
    fn test_not_found_returns_404() {
        assert_eq!(not_found().status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_and_config_return_500() {
        let config = CinemaError::Config(ConfigError::MissingField {
            field: "table_name".to_string(),
            source_hint: "TABLE_NAME_CINES".to_string(),
        });
        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            CinemaError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

// =============================================================================
// Error Response Format Tests
// =============================================================================

mod error_response_tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(CinemaError::Unauthorized.error_code(), "UNAUTHORIZED");
        assert_eq!(CinemaError::Forbidden.error_code(), "FORBIDDEN");
        assert_eq!(CinemaError::NothingToUpdate.error_code(), "NOTHING_TO_UPDATE");
        assert_eq!(not_found().error_code(), "CINEMA_NOT_FOUND");
        assert_eq!(CinemaError::Internal(String::new()).error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_missing_fields_details() {
        let err = CinemaError::MissingFields {
            fields: vec!["provincia".to_string(), "distrito".to_string()],
        };
        let response = err.to_response();
        assert_eq!(response.code, "MISSING_FIELDS");
        assert!(response.message.contains("provincia, distrito"));
        assert_eq!(
            response.details,
            Some(serde_json::json!({"fields": ["provincia", "distrito"]}))
        );
    }

    #[test]
    fn test_not_found_details() {
        let response = not_found().to_response();
        assert_eq!(
            response.details,
            Some(serde_json::json!({"tenant_id": "t1", "ordenamiento": "Lima#Lima#Surco"}))
        );
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = CinemaError::Internal("connection refused by 10.0.0.7:8000".to_string());
        let response = err.to_response();
        assert!(!response.message.contains("10.0.0.7"));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_config_message_is_generic() {
        let err = CinemaError::from(ConfigError::MissingField {
            field: "token_validator".to_string(),
            source_hint: "LAMBDA_VALIDAR_TOKEN".to_string(),
        });
        assert!(err.is_internal());
        assert!(!err.public_message().contains("LAMBDA_VALIDAR_TOKEN"));
        assert!(err.to_string().contains("LAMBDA_VALIDAR_TOKEN"));
    }
}

// =============================================================================
// Error Conversion Tests
// =============================================================================

mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_anyhow_error_becomes_internal() {
        let err: CinemaError = anyhow::anyhow!("throttled").into();
        assert!(matches!(err, CinemaError::Internal(ref msg) if msg.contains("throttled")));
    }

    #[test]
    fn test_wrapped_cinema_error_is_preserved() {
        let err: CinemaError = anyhow::Error::new(CinemaError::Forbidden).into();
        assert!(matches!(err, CinemaError::Forbidden));
    }

    #[test]
    fn test_serde_json_error_becomes_internal() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: CinemaError = json_err.into();
        assert!(err.is_internal());
    }

    #[test]
    fn test_invalid_segment_becomes_invalid_field() {
        let location = LocationPath::local("Lima", "Lima", "Sur#co");
        let err: CinemaError = location.validate_segments().unwrap_err().into();
        match err {
            CinemaError::InvalidField { field, .. } => assert_eq!(field, "distrito"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

// =============================================================================
// IntoResponse Tests
// =============================================================================

mod into_response_tests {
    use super::*;

    #[test]
    fn test_into_response_status() {
        assert_eq!(
            CinemaError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(not_found().into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            CinemaError::Internal("x".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
