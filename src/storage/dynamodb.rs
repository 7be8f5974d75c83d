//! DynamoDB implementation of CinemaStore
//!
//! The table uses `tenant_id` as partition key and `ordenamiento` (the
//! composite location key) as sort key. Items are converted with
//! `serde_dynamo`, so the attribute names are the serde names of
//! [`CinemaRecord`].

use crate::core::location::ScanPredicates;
use crate::core::record::{CinemaPatch, CinemaRecord, PARTITION_KEY, SORT_KEY};
use crate::core::store::CinemaStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDBClient;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use std::collections::HashMap;

type Item = HashMap<String, AttributeValue>;

/// DynamoDB implementation of CinemaStore
#[derive(Clone)]
pub struct DynamoDBCinemaStore {
    client: DynamoDBClient,
    table_name: String,
}

impl DynamoDBCinemaStore {
    pub fn new(client: DynamoDBClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Build a client from the ambient AWS configuration
    pub async fn from_env(table_name: impl Into<String>) -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(DynamoDBClient::new(&config), table_name)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn key(tenant_id: &str, location_key: &str) -> Item {
        HashMap::from([
            (PARTITION_KEY.to_string(), AttributeValue::S(tenant_id.to_string())),
            (SORT_KEY.to_string(), AttributeValue::S(location_key.to_string())),
        ])
    }

    fn record_to_item(record: &CinemaRecord) -> Result<Item> {
        serde_dynamo::to_item(record).context("failed to convert cinema to a DynamoDB item")
    }

    fn item_to_record(item: Item) -> Result<CinemaRecord> {
        serde_dynamo::from_item(item).context("failed to read cinema from a DynamoDB item")
    }

    fn items_to_records(items: Vec<Item>) -> Result<Vec<CinemaRecord>> {
        items.into_iter().map(Self::item_to_record).collect()
    }
}

/// Filter expression and values for a scan
///
/// Returns `None` when no predicate is set.
fn scan_filter(predicates: &ScanPredicates) -> Option<(String, Item)> {
    let mut clauses = Vec::new();
    let mut values = HashMap::new();

    if let Some(prefix) = &predicates.begins_with {
        clauses.push("begins_with(#sk, :begins)".to_string());
        values.insert(":begins".to_string(), AttributeValue::S(prefix.clone()));
    }
    if let Some(fragment) = &predicates.contains {
        clauses.push("contains(#sk, :contains)".to_string());
        values.insert(":contains".to_string(), AttributeValue::S(fragment.clone()));
    }
    // DynamoDB has no ends_with; it is applied after the scan
    if clauses.is_empty() {
        return None;
    }
    Some((clauses.join(" AND "), values))
}

/// `SET` expression, names and values for a partial update
fn update_expression(patch: &CinemaPatch) -> (String, HashMap<String, String>, Item) {
    let mut assignments = Vec::new();
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    for (attribute, value) in patch.attributes() {
        assignments.push(format!("#{attribute} = :{attribute}"));
        names.insert(format!("#{attribute}"), attribute.to_string());
        values.insert(format!(":{attribute}"), AttributeValue::S(value.to_string()));
    }

    (format!("SET {}", assignments.join(", ")), names, values)
}

#[async_trait]
impl CinemaStore for DynamoDBCinemaStore {
    async fn get(&self, tenant_id: &str, location_key: &str) -> Result<Option<CinemaRecord>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(tenant_id, location_key)))
            .send()
            .await?;

        match result.item {
            Some(item) => Ok(Some(Self::item_to_record(item)?)),
            None => Ok(None),
        }
    }

    async fn query_prefix(&self, tenant_id: &str, prefix: &str) -> Result<Vec<CinemaRecord>> {
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .query()
                .table_name(&self.table_name)
                .expression_attribute_names("#pk", PARTITION_KEY)
                .expression_attribute_values(":tenant_id", AttributeValue::S(tenant_id.to_string()))
                .set_exclusive_start_key(start_key.take());

            request = if prefix.is_empty() {
                request.key_condition_expression("#pk = :tenant_id")
            } else {
                request
                    .key_condition_expression("#pk = :tenant_id AND begins_with(#sk, :prefix)")
                    .expression_attribute_names("#sk", SORT_KEY)
                    .expression_attribute_values(":prefix", AttributeValue::S(prefix.to_string()))
            };

            let result = request.send().await?;
            if let Some(items) = result.items {
                records.extend(Self::items_to_records(items)?);
            }

            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(records)
    }

    async fn scan(&self, predicates: &ScanPredicates) -> Result<Vec<CinemaRecord>> {
        let filter = scan_filter(predicates);
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take());

            if let Some((expression, values)) = &filter {
                request = request
                    .filter_expression(expression)
                    .expression_attribute_names("#sk", SORT_KEY)
                    .set_expression_attribute_values(Some(values.clone()));
            }

            let result = request.send().await?;
            if let Some(items) = result.items {
                records.extend(
                    Self::items_to_records(items)?
                        .into_iter()
                        .filter(|record| predicates.matches(&record.location_key)),
                );
            }

            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(records)
    }

    async fn put(&self, record: CinemaRecord) -> Result<CinemaRecord> {
        let item = Self::record_to_item(&record)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(record)
    }

    async fn update(
        &self,
        tenant_id: &str,
        location_key: &str,
        patch: &CinemaPatch,
    ) -> Result<Option<CinemaRecord>> {
        if patch.is_empty() {
            return self.get(tenant_id, location_key).await;
        }

        let (expression, mut names, values) = update_expression(patch);
        names.insert("#pk".to_string(), PARTITION_KEY.to_string());

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(tenant_id, location_key)))
            .update_expression(expression)
            .condition_expression("attribute_exists(#pk)")
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => match output.attributes {
                Some(item) => Ok(Some(Self::item_to_record(item)?)),
                None => Ok(None),
            },
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
