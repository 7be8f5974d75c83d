//! Cinema operations
//!
//! [`CinemaService`] orchestrates every operation the same way:
//!
//! ```text
//! token check ──► field validation ──► key construction ──► one store call
//!  401 / 403          400                   400              404 / 500
//! ```
//!
//! It is transport-agnostic: the REST exposure and the tests call it
//! directly with the raw `Authorization` value and a decoded payload.

use crate::core::auth::TokenValidator;
use crate::core::error::{CinemaError, CinemaResult};
use crate::core::record::CinemaRecord;
use crate::core::request::{CreateRequest, SearchRequest, UpdateRequest};
use crate::core::store::CinemaStore;
use crate::core::validation::{RequiredFields, filters};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Search, create and update over a [`CinemaStore`]
#[derive(Clone)]
pub struct CinemaService {
    store: Arc<dyn CinemaStore>,
    validator: Arc<dyn TokenValidator>,
    allow_scan: bool,
}

impl CinemaService {
    pub fn new(store: Arc<dyn CinemaStore>, validator: Arc<dyn TokenValidator>) -> Self {
        Self {
            store,
            validator,
            allow_scan: true,
        }
    }

    /// Allow or refuse tenant-less searches (full scans)
    pub fn with_scan(mut self, allow_scan: bool) -> Self {
        self.allow_scan = allow_scan;
        self
    }

    pub fn allows_scan(&self) -> bool {
        self.allow_scan
    }

    /// Require a token and have the delegate approve it
    async fn authorize(&self, tenant_id: Option<&str>, authorization: Option<&str>) -> CinemaResult<()> {
        let token = filters::bearer_token(authorization).ok_or(CinemaError::Unauthorized)?;

        let decision = self.validator.validate(tenant_id, &token).await?;
        if !decision.is_allowed() {
            tracing::info!(tenant_id = tenant_id.unwrap_or("-"), "token denied by delegate");
            return Err(CinemaError::Forbidden);
        }
        Ok(())
    }

    /// Outcome of a request whose payload could not be decoded
    ///
    /// The token is still checked first, so an unauthenticated caller gets
    /// 401/403 whatever it sent. With no decoded tenant the delegate is asked
    /// without one. An authorized caller gets an internal error.
    pub async fn reject_undecodable(
        &self,
        operation: &'static str,
        authorization: Option<&str>,
        reason: String,
    ) -> CinemaError {
        let span = tracing::info_span!(
            "cines.undecodable",
            request_id = %Uuid::new_v4(),
            operation,
        );

        async move {
            if let Err(err) = self.authorize(None, authorization).await {
                return err;
            }
            tracing::warn!(reason = %reason, "payload could not be decoded");
            CinemaError::Internal(format!("malformed {operation} payload: {reason}"))
        }
        .instrument(span)
        .await
    }

    /// Find cinemas of a tenant, optionally narrowed by location
    ///
    /// Without a tenant the search falls back to a full scan, unless scans
    /// are disabled. Zero matches is an empty list, not an error.
    pub async fn search(
        &self,
        authorization: Option<&str>,
        request: SearchRequest,
    ) -> CinemaResult<Vec<CinemaRecord>> {
        let request = request.normalized();
        let span = tracing::info_span!(
            "cines.search",
            request_id = %Uuid::new_v4(),
            tenant_id = request.tenant_id.as_deref().unwrap_or("-"),
        );

        async move {
            self.authorize(request.tenant_id.as_deref(), authorization).await?;

            let location = request.location();
            location.validate_segments()?;

            let records = match request.tenant_id.as_deref() {
                Some(tenant_id) => {
                    let prefix = location.search_prefix();
                    tracing::debug!(prefix = %prefix, "partition query");
                    self.store
                        .query_prefix(tenant_id, &prefix)
                        .await?
                        .into_iter()
                        .filter(|record| location.matches_key(&record.location_key))
                        .collect::<Vec<_>>()
                }
                None if self.allow_scan => {
                    let predicates = location.scan_predicates();
                    tracing::warn!(?predicates, "search without tenant_id, scanning the whole table");
                    self.store
                        .scan(&predicates)
                        .await?
                        .into_iter()
                        .filter(|record| location.matches_key(&record.location_key))
                        .collect::<Vec<_>>()
                }
                None => {
                    return Err(CinemaError::MissingFields {
                        fields: vec!["tenant_id".to_string()],
                    });
                }
            };

            tracing::info!(matches = records.len(), "search complete");
            Ok(records)
        }
        .instrument(span)
        .await
    }

    /// Write a cinema, replacing any record at the same key
    pub async fn create(
        &self,
        authorization: Option<&str>,
        request: CreateRequest,
    ) -> CinemaResult<CinemaRecord> {
        let request = request.normalized();
        let span = tracing::info_span!(
            "cines.create",
            request_id = %Uuid::new_v4(),
            tenant_id = request.tenant_id.as_deref().unwrap_or("-"),
        );

        async move {
            self.authorize(request.tenant_id.as_deref(), authorization).await?;

            if let Some(err) = CinemaError::from_field_check(request.check_required()) {
                return Err(err);
            }
            request.location().validate_segments()?;

            let record = request.into_record().ok_or_else(|| {
                CinemaError::Internal("required field vanished after validation".to_string())
            })?;

            let written = self.store.put(record).await?;
            tracing::info!(location_key = %written.location_key, "cinema written");
            Ok(written)
        }
        .instrument(span)
        .await
    }

    /// Set the supplied attributes on the cinema at an exact key
    pub async fn update(
        &self,
        authorization: Option<&str>,
        request: UpdateRequest,
    ) -> CinemaResult<CinemaRecord> {
        let request = request.normalized();
        let span = tracing::info_span!(
            "cines.update",
            request_id = %Uuid::new_v4(),
            tenant_id = request.tenant_id.as_deref().unwrap_or("-"),
        );

        async move {
            self.authorize(request.tenant_id.as_deref(), authorization).await?;

            if let Some(err) = CinemaError::from_field_check(request.check_required()) {
                return Err(err);
            }

            let location = request.location();
            location.validate_segments()?;

            let tenant_id = request.tenant_id.clone().unwrap_or_default();
            let location_key = location.key();
            let not_found = || CinemaError::NotFound {
                tenant_id: tenant_id.clone(),
                location_key: location_key.clone(),
            };

            if self.store.get(&tenant_id, &location_key).await?.is_none() {
                return Err(not_found());
            }

            let patch = request.patch();
            if patch.is_empty() {
                return Err(CinemaError::NothingToUpdate);
            }

            let updated = self
                .store
                .update(&tenant_id, &location_key, &patch)
                .await?
                .ok_or_else(not_found)?;

            tracing::info!(
                location_key = %updated.location_key,
                attributes = patch.attributes().len(),
                "cinema updated"
            );
            Ok(updated)
        }
        .instrument(span)
        .await
    }
}
