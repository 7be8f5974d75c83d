//! In-memory implementation of CinemaStore for testing and development

use crate::core::location::ScanPredicates;
use crate::core::record::{CinemaPatch, CinemaRecord};
use crate::core::store::CinemaStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

type Key = (String, String);

/// In-memory cinema store
///
/// Records are kept in a `BTreeMap` keyed by `(tenant_id, location_key)`, so
/// a partition is a contiguous, key-ordered range like in a sorted table.
/// Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryCinemaStore {
    records: Arc<RwLock<BTreeMap<Key, CinemaRecord>>>,
}

impl InMemoryCinemaStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, across every tenant
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CinemaStore for InMemoryCinemaStore {
    async fn get(&self, tenant_id: &str, location_key: &str) -> Result<Option<CinemaRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records
            .get(&(tenant_id.to_string(), location_key.to_string()))
            .cloned())
    }

    async fn query_prefix(&self, tenant_id: &str, prefix: &str) -> Result<Vec<CinemaRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let start = (tenant_id.to_string(), prefix.to_string());
        Ok(records
            .range(start..)
            .take_while(|((tenant, key), _)| tenant == tenant_id && key.starts_with(prefix))
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn scan(&self, predicates: &ScanPredicates) -> Result<Vec<CinemaRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records
            .values()
            .filter(|record| predicates.matches(&record.location_key))
            .cloned()
            .collect())
    }

    async fn put(&self, record: CinemaRecord) -> Result<CinemaRecord> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.insert(
            (record.tenant_id.clone(), record.location_key.clone()),
            record.clone(),
        );

        Ok(record)
    }

    async fn update(
        &self,
        tenant_id: &str,
        location_key: &str,
        patch: &CinemaPatch,
    ) -> Result<Option<CinemaRecord>> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(records
            .get_mut(&(tenant_id.to_string(), location_key.to_string()))
            .map(|record| {
                record.apply(patch);
                record.clone()
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::LocationPath;

    fn record(tenant: &str, dep: &str, prov: &str, dist: &str) -> CinemaRecord {
        CinemaRecord::new(tenant, LocationPath::local(dep, prov, dist), dist, "Av. X")
    }

    async fn seeded() -> InMemoryCinemaStore {
        let store = InMemoryCinemaStore::new();
        for r in [
            record("t1", "Lima", "Lima", "Surco"),
            record("t1", "Lima", "Lima", "Miraflores"),
            record("t1", "Lima", "Callao", "Bellavista"),
            record("t1", "Cusco", "Cusco", "Wanchaq"),
            record("t2", "Lima", "Lima", "Surco"),
        ] {
            store.put(r).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = seeded().await;
        let found = store.get("t1", "Lima#Lima#Surco").await.unwrap();
        assert_eq!(found.unwrap().name, "Surco");
        assert!(store.get("t3", "Lima#Lima#Surco").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = seeded().await;
        let mut replacement = record("t1", "Lima", "Lima", "Surco");
        replacement.name = "Renamed".into();
        store.put(replacement).await.unwrap();

        assert_eq!(store.len(), 5);
        let found = store.get("t1", "Lima#Lima#Surco").await.unwrap().unwrap();
        assert_eq!(found.name, "Renamed");
    }

    #[tokio::test]
    async fn test_query_prefix_stays_in_partition() {
        let store = seeded().await;

        let all = store.query_prefix("t1", "").await.unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|r| r.tenant_id == "t1"));

        let lima = store.query_prefix("t1", "Lima#Lima").await.unwrap();
        let keys: Vec<_> = lima.iter().map(|r| r.location_key.as_str()).collect();
        assert_eq!(keys, vec!["Lima#Lima#Miraflores", "Lima#Lima#Surco"]);

        assert!(store.query_prefix("t9", "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scan_crosses_partitions() {
        let store = seeded().await;
        let predicates = ScanPredicates {
            ends_with: Some("#Surco".into()),
            ..Default::default()
        };
        let found = store.scan(&predicates).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_update_sets_named_attributes() {
        let store = seeded().await;
        let patch = CinemaPatch {
            contact: Some("999".into()),
            ..Default::default()
        };
        let updated = store
            .update("t1", "Lima#Lima#Surco", &patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.contact.as_deref(), Some("999"));
        assert_eq!(updated.name, "Surco");

        let untouched = store.get("t2", "Lima#Lima#Surco").await.unwrap().unwrap();
        assert_eq!(untouched.contact, None);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = InMemoryCinemaStore::new();
        let patch = CinemaPatch {
            name: Some("x".into()),
            ..Default::default()
        };
        assert!(store.update("t1", "nope", &patch).await.unwrap().is_none());
        assert!(store.is_empty());
    }
}
