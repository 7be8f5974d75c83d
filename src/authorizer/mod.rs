//! Remote token validators
//!
//! Each backend implements [`TokenValidator`] and sits behind a cargo
//! feature. [`build_validator`] picks one from a [`ValidatorTarget`].

#[cfg(feature = "http-authorizer")]
pub mod http;
#[cfg(feature = "lambda-authorizer")]
pub mod lambda;

#[cfg(feature = "http-authorizer")]
pub use http::HttpTokenValidator;
#[cfg(feature = "lambda-authorizer")]
pub use lambda::LambdaTokenValidator;

use crate::config::ValidatorTarget;
use crate::core::auth::{StaticTokenValidator, TokenValidator};
use crate::core::error::ConfigError;
use std::sync::Arc;

/// Build the validator a target points at
///
/// Fails when the target needs a backend compiled out of this build.
pub async fn build_validator(
    target: &ValidatorTarget,
) -> Result<Arc<dyn TokenValidator>, ConfigError> {
    match target {
        ValidatorTarget::Static(tokens) => {
            let validator = StaticTokenValidator::from_list(tokens);
            if validator.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "token_validator".to_string(),
                    value: format!("static:{}", tokens),
                    message: "no tokens listed".to_string(),
                });
            }
            tracing::warn!(tokens = validator.len(), "using static token validator");
            Ok(Arc::new(validator))
        }

        #[cfg(feature = "http-authorizer")]
        ValidatorTarget::Http(url) => {
            tracing::info!(url = %url, "delegating token checks over HTTP");
            Ok(Arc::new(HttpTokenValidator::new(url.clone())))
        }
        #[cfg(not(feature = "http-authorizer"))]
        ValidatorTarget::Http(url) => Err(disabled(url, "http-authorizer")),

        #[cfg(feature = "lambda-authorizer")]
        ValidatorTarget::Lambda(function_name) => {
            tracing::info!(function = %function_name, "delegating token checks to Lambda");
            Ok(Arc::new(LambdaTokenValidator::from_env(function_name.clone()).await))
        }
        #[cfg(not(feature = "lambda-authorizer"))]
        ValidatorTarget::Lambda(function_name) => Err(disabled(function_name, "lambda-authorizer")),
    }
}

#[cfg(any(not(feature = "http-authorizer"), not(feature = "lambda-authorizer")))]
fn disabled(value: &str, feature: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: "token_validator".to_string(),
        value: value.to_string(),
        message: format!("this build lacks the '{}' feature", feature),
    }
}
