use anyhow::Result;
use async_trait::async_trait;
use derive_getters::Getters;
use derive_new::new;
use serde_json::Value;

/// One record in the external document store: an opaque id plus a
/// property bag keyed by property name.
#[derive(Clone, Debug, Getters, new)]
pub struct StoredRecord {
    id: String,
    properties: Value,
}

/// The external document store, reduced to the four operations the
/// sync core needs. Implemented over the Notion HTTP API in
/// production and by an in-memory double in tests.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Exact-match query on a title property.
    async fn query_by_title(
        &self,
        database_id: &str,
        property: &str,
        value: &str,
    ) -> Result<Vec<StoredRecord>>;

    async fn query_all(&self, database_id: &str, page_size: u32) -> Result<Vec<StoredRecord>>;

    async fn create_record(&self, database_id: &str, properties: Value) -> Result<StoredRecord>;

    async fn update_record(&self, record_id: &str, properties: Value) -> Result<()>;

    async fn archive_record(&self, record_id: &str) -> Result<()>;
}
