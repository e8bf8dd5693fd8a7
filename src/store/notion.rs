use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::records::{RecordStore, StoredRecord};
use crate::api::utils::check_status;

const BASE_URL: &str = "https://api.notion.com";
const NOTION_VERSION: &str = "2022-06-28";

#[derive(Clone, Debug)]
pub struct NotionStore {
    client: Client,
    base_url: String,
    token: String,
}

impl NotionStore {
    pub fn new(token: String) -> Self {
        Self::with_base_url(BASE_URL, token)
    }

    pub fn with_base_url(base_url: &str, token: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            token,
        }
    }

    async fn post(&self, path: &str, body: Value, context: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await?;

        let res = check_status(res, context).await?;
        res.json::<Value>()
            .await
            .with_context(|| format!("{}: unexpected response body", context))
    }

    async fn patch(&self, path: &str, body: Value, context: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let res = self
            .client
            .patch(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await?;

        let res = check_status(res, context).await?;
        res.json::<Value>()
            .await
            .with_context(|| format!("{}: unexpected response body", context))
    }

    fn parse_records(response: Value) -> Vec<StoredRecord> {
        response
            .get("results")
            .and_then(Value::as_array)
            .map(|results| {
                results
                    .iter()
                    .filter_map(|page| {
                        let id = page.get("id")?.as_str()?.to_string();
                        let properties = page.get("properties").cloned().unwrap_or_else(|| json!({}));
                        Some(StoredRecord::new(id, properties))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for NotionStore {
    async fn query_by_title(
        &self,
        database_id: &str,
        property: &str,
        value: &str,
    ) -> Result<Vec<StoredRecord>> {
        let body = json!({
            "filter": {
                "property": property,
                "title": { "equals": value }
            }
        });
        let res = self
            .post(
                &format!("/v1/databases/{}/query", database_id),
                body,
                "Record query",
            )
            .await?;

        Ok(Self::parse_records(res))
    }

    async fn query_all(&self, database_id: &str, page_size: u32) -> Result<Vec<StoredRecord>> {
        let body = json!({ "page_size": page_size });
        let res = self
            .post(
                &format!("/v1/databases/{}/query", database_id),
                body,
                "Record scan",
            )
            .await?;

        Ok(Self::parse_records(res))
    }

    async fn create_record(&self, database_id: &str, properties: Value) -> Result<StoredRecord> {
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties
        });
        let res = self.post("/v1/pages", body, "Record create").await?;

        let id = res
            .get("id")
            .and_then(Value::as_str)
            .with_context(|| "Record create: missing id in response")?
            .to_string();

        Ok(StoredRecord::new(id, properties))
    }

    async fn update_record(&self, record_id: &str, properties: Value) -> Result<()> {
        self.patch(
            &format!("/v1/pages/{}", record_id),
            json!({ "properties": properties }),
            "Record update",
        )
        .await?;
        Ok(())
    }

    async fn archive_record(&self, record_id: &str) -> Result<()> {
        self.patch(
            &format!("/v1/pages/{}", record_id),
            json!({ "archived": true }),
            "Record archive",
        )
        .await?;
        Ok(())
    }
}
