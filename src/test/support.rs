use std::sync::Mutex;

use anyhow::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::store::{RecordStore, StoredRecord, props};

struct MemoryRecord {
    id: String,
    database_id: String,
    properties: Value,
    archived: bool,
}

/// In-memory record store for exercising the reconcile and aggregate
/// paths without a live document store.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<MemoryRecord>>,
    fail_databases: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every create against the given database fail.
    pub fn fail_creates_for(&self, database_id: &str) {
        self.fail_databases
            .lock()
            .unwrap()
            .push(database_id.to_string());
    }

    pub fn insert(&self, database_id: &str, properties: Value) -> String {
        let mut records = self.records.lock().unwrap();
        let id = format!("record-{}", records.len() + 1);
        records.push(MemoryRecord {
            id: id.clone(),
            database_id: database_id.to_string(),
            properties,
            archived: false,
        });
        id
    }

    pub fn records_in(&self, database_id: &str) -> Vec<StoredRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.database_id == database_id && !record.archived)
            .map(|record| StoredRecord::new(record.id.clone(), record.properties.clone()))
            .collect()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn query_by_title(
        &self,
        database_id: &str,
        property: &str,
        value: &str,
    ) -> Result<Vec<StoredRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.database_id == database_id && !record.archived)
            .filter(|record| {
                props::title_text(&record.properties, property).as_deref() == Some(value)
            })
            .map(|record| StoredRecord::new(record.id.clone(), record.properties.clone()))
            .collect())
    }

    async fn query_all(&self, database_id: &str, _page_size: u32) -> Result<Vec<StoredRecord>> {
        Ok(self.records_in(database_id))
    }

    async fn create_record(&self, database_id: &str, properties: Value) -> Result<StoredRecord> {
        if self
            .fail_databases
            .lock()
            .unwrap()
            .iter()
            .any(|failing| failing == database_id)
        {
            return Err(Error::msg(format!("create rejected for {}", database_id)));
        }

        let id = self.insert(database_id, properties.clone());
        Ok(StoredRecord::new(id, properties))
    }

    async fn update_record(&self, record_id: &str, properties: Value) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|record| record.id == record_id)
            .ok_or_else(|| Error::msg(format!("unknown record {}", record_id)))?;
        record.properties = properties;
        Ok(())
    }

    async fn archive_record(&self, record_id: &str) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|record| record.id == record_id)
            .ok_or_else(|| Error::msg(format!("unknown record {}", record_id)))?;
        record.archived = true;
        Ok(())
    }
}
