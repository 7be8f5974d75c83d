//! Token validation for cinema operations
//!
//! Every operation hands the caller's bearer token to a [`TokenValidator`]
//! before touching the store. The validator is injected, so the remote
//! delegate (a Lambda function or an HTTP endpoint) can be swapped for an
//! in-process policy such as [`StaticTokenValidator`] without changing the
//! operations.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Outcome of a token check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allowed,
    Denied,
}

impl AuthDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthDecision::Allowed)
    }
}

/// Payload sent to a token delegate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenCheck<'a> {
    pub tenant_id: Option<&'a str>,
    pub token: &'a str,
}

/// Status code a delegate uses to deny a token
pub const DENIED_STATUS: u16 = 403;

/// Read a delegate response
///
/// The response must expose a numeric `statusCode`; `403` means denied and
/// any other value means allowed.
pub fn decision_from_response(response: &Value) -> Result<AuthDecision> {
    let status = response
        .get("statusCode")
        .and_then(|code| {
            code.as_u64()
                .or_else(|| code.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
        })
        .ok_or_else(|| anyhow!("token delegate response has no statusCode: {}", response))?;

    Ok(if status == u64::from(DENIED_STATUS) {
        AuthDecision::Denied
    } else {
        AuthDecision::Allowed
    })
}

/// Approves or denies a bearer token for a tenant
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validate `token`, optionally scoped to `tenant_id`
    ///
    /// An `Err` means the delegate could not be consulted; it is not a denial.
    async fn validate(&self, tenant_id: Option<&str>, token: &str) -> Result<AuthDecision>;
}

/// In-process validator backed by a fixed token table
///
/// Each token is either valid for every tenant or bound to one tenant.
/// Useful for local development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenValidator {
    tokens: HashMap<String, Option<String>>,
}

impl StaticTokenValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` for any tenant
    pub fn allow(mut self, token: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), None);
        self
    }

    /// Accept `token` only for `tenant_id`
    pub fn allow_for_tenant(mut self, token: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), Some(tenant_id.into()));
        self
    }

    /// Parse a comma-separated list of `token` or `token@tenant` entries
    pub fn from_list(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .fold(Self::new(), |validator, entry| match entry.split_once('@') {
                Some((token, tenant)) => validator.allow_for_tenant(token.trim(), tenant.trim()),
                None => validator.allow(entry),
            })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenValidator for StaticTokenValidator {
    async fn validate(&self, tenant_id: Option<&str>, token: &str) -> Result<AuthDecision> {
        let decision = match self.tokens.get(token) {
            Some(None) => AuthDecision::Allowed,
            Some(Some(bound)) if tenant_id == Some(bound.as_str()) => AuthDecision::Allowed,
            _ => AuthDecision::Denied,
        };
        Ok(decision)
    }
}
