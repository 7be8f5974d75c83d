//! Token validation by calling an HTTP endpoint

use crate::core::auth::{
    AuthDecision, DENIED_STATUS, TokenCheck, TokenValidator, decision_from_response,
};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;

/// Validator that POSTs the token check as JSON
///
/// An HTTP 403 or a body with `statusCode: 403` denies the token. A
/// successful response without a `statusCode` allows it. Any other HTTP
/// error status is a delegate failure.
#[derive(Clone)]
pub struct HttpTokenValidator {
    client: reqwest::Client,
    url: String,
}

impl HttpTokenValidator {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TokenValidator for HttpTokenValidator {
    async fn validate(&self, tenant_id: Option<&str>, token: &str) -> Result<AuthDecision> {
        let response = self
            .client
            .post(&self.url)
            .json(&TokenCheck { tenant_id, token })
            .send()
            .await
            .with_context(|| format!("failed to reach token validator at {}", self.url))?;

        let status = response.status();
        if status.as_u16() == DENIED_STATUS {
            return Ok(AuthDecision::Denied);
        }
        if !status.is_success() {
            return Err(anyhow!("token validator at {} answered {}", self.url, status));
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(AuthDecision::Allowed);
        }

        let payload: Value =
            serde_json::from_slice(&body).context("token validator returned a non-JSON body")?;
        if payload.get("statusCode").is_some() {
            decision_from_response(&payload)
        } else {
            Ok(AuthDecision::Allowed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    /// Serve a fake delegate on an ephemeral port
    async fn spawn_delegate(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/validate", addr)
    }

    fn delegate() -> Router {
        Router::new().route(
            "/validate",
            post(|Json(body): Json<Value>| async move {
                match body["token"].as_str() {
                    Some("good") => (StatusCode::OK, Json(json!({"statusCode": 200}))),
                    Some("soft-deny") => (StatusCode::OK, Json(json!({"statusCode": 403}))),
                    Some("hard-deny") => (StatusCode::FORBIDDEN, Json(json!({}))),
                    Some("plain") => (StatusCode::OK, Json(json!({"ok": true}))),
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_http_delegate_decisions() {
        let url = spawn_delegate(delegate()).await;
        let validator = HttpTokenValidator::new(url);

        assert!(validator.validate(Some("t1"), "good").await.unwrap().is_allowed());
        assert!(validator.validate(None, "plain").await.unwrap().is_allowed());
        assert_eq!(
            validator.validate(Some("t1"), "soft-deny").await.unwrap(),
            AuthDecision::Denied
        );
        assert_eq!(
            validator.validate(Some("t1"), "hard-deny").await.unwrap(),
            AuthDecision::Denied
        );
    }

    #[tokio::test]
    async fn test_http_delegate_failure_is_an_error() {
        let url = spawn_delegate(delegate()).await;
        let validator = HttpTokenValidator::new(url);
        assert!(validator.validate(Some("t1"), "boom").await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_delegate_is_an_error() {
        let validator = HttpTokenValidator::new("http://127.0.0.1:1/validate");
        assert!(validator.validate(None, "good").await.is_err());
    }
}
