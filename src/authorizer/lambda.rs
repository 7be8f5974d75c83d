//! Token validation by invoking a Lambda function

use crate::core::auth::{AuthDecision, TokenCheck, TokenValidator, decision_from_response};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use aws_sdk_lambda::Client as LambdaClient;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use serde_json::Value;

/// Validator that synchronously invokes a Lambda function
///
/// The function receives `{"tenant_id": ..., "token": ...}` and answers
/// with an object carrying `statusCode`.
#[derive(Clone)]
pub struct LambdaTokenValidator {
    client: LambdaClient,
    function_name: String,
}

impl LambdaTokenValidator {
    pub fn new(client: LambdaClient, function_name: impl Into<String>) -> Self {
        Self {
            client,
            function_name: function_name.into(),
        }
    }

    /// Build a client from the ambient AWS configuration
    pub async fn from_env(function_name: impl Into<String>) -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(LambdaClient::new(&config), function_name)
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }
}

#[async_trait]
impl TokenValidator for LambdaTokenValidator {
    async fn validate(&self, tenant_id: Option<&str>, token: &str) -> Result<AuthDecision> {
        let payload = serde_json::to_vec(&TokenCheck { tenant_id, token })?;

        let output = self
            .client
            .invoke()
            .function_name(&self.function_name)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload))
            .send()
            .await
            .with_context(|| format!("failed to invoke token validator '{}'", self.function_name))?;

        if let Some(function_error) = output.function_error() {
            return Err(anyhow!(
                "token validator '{}' failed: {}",
                self.function_name,
                function_error
            ));
        }

        let body = output
            .payload()
            .ok_or_else(|| anyhow!("token validator '{}' returned no payload", self.function_name))?;
        let response: Value = serde_json::from_slice(body.as_ref())
            .context("token validator returned a non-JSON payload")?;

        decision_from_response(&response)
    }
}
