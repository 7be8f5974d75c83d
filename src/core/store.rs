//! Store trait for cinema records

use crate::core::location::ScanPredicates;
use crate::core::record::{CinemaPatch, CinemaRecord};
use anyhow::Result;
use async_trait::async_trait;

/// Tenant-partitioned record store
///
/// Records are addressed by `(tenant_id, location_key)`. Implementations
/// provide the primitive operations only; key construction and filtering
/// live in the service layer. The framework is agnostic to the underlying
/// storage mechanism.
#[async_trait]
pub trait CinemaStore: Send + Sync {
    /// Point read by exact key
    async fn get(&self, tenant_id: &str, location_key: &str) -> Result<Option<CinemaRecord>>;

    /// Partition query, restricted to sort keys starting with `prefix`
    ///
    /// An empty prefix returns the whole partition. Results are ordered by
    /// sort key.
    async fn query_prefix(&self, tenant_id: &str, prefix: &str) -> Result<Vec<CinemaRecord>>;

    /// Full scan across every partition, filtered by key predicates
    async fn scan(&self, predicates: &ScanPredicates) -> Result<Vec<CinemaRecord>>;

    /// Whole-item write; an existing record at the same key is replaced
    async fn put(&self, record: CinemaRecord) -> Result<CinemaRecord>;

    /// Set the named attributes on an existing record
    ///
    /// Returns the full record after the update, or `None` when nothing is
    /// stored at the key.
    async fn update(
        &self,
        tenant_id: &str,
        location_key: &str,
        patch: &CinemaPatch,
    ) -> Result<Option<CinemaRecord>>;
}
