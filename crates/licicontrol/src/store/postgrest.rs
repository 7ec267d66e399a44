use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{ListQuery, RowStore, StoreError};
use crate::config::SupabaseConfig;

/// Supabase tables reached through the PostgREST interface at `{url}/rest/v1`.
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    client: Client,
    rest_url: String,
    api_key: String,
}

impl PostgrestStore {
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .build()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", value);
        }
        request.headers(headers).bearer_auth(&self.api_key)
    }

    fn returning(request: RequestBuilder) -> RequestBuilder {
        request.header("Prefer", "return=representation")
    }

    async fn rows(table: &str, response: Response) -> Result<Vec<Value>, StoreError> {
        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(StoreError::Conflict);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(table, status = status.as_u16(), "postgrest request rejected");
            return Err(StoreError::Unavailable(format!(
                "{table} answered {}: {body}",
                status.as_u16()
            )));
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    async fn send(&self, table: &str, request: RequestBuilder) -> Result<Vec<Value>, StoreError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Self::rows(table, response).await
    }
}

#[async_trait]
impl RowStore for PostgrestStore {
    async fn insert(&self, table: &'static str, row: Value) -> Result<Value, StoreError> {
        debug!(table, "inserting row");
        let request = Self::returning(self.client.post(self.table_url(table)).json(&row));
        self.send(table, request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Unavailable(format!("{table} returned no inserted row")))
    }

    async fn update(&self, table: &'static str, id: Uuid, row: Value) -> Result<Value, StoreError> {
        debug!(table, %id, "updating row");
        let request = Self::returning(
            self.client
                .patch(self.table_url(table))
                .query(&[("id", format!("eq.{id}"))])
                .json(&row),
        );
        self.send(table, request)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    async fn fetch(&self, table: &'static str, id: Uuid) -> Result<Option<Value>, StoreError> {
        let request = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))]);
        Ok(self.send(table, request).await?.into_iter().next())
    }

    async fn list(&self, table: &'static str, query: ListQuery) -> Result<Vec<Value>, StoreError> {
        let mut params = vec![
            ("select".to_string(), "*".to_string()),
            ("order".to_string(), "created_at.desc".to_string()),
        ];
        if let Some(filter) = &query.filter {
            params.push((filter.column.to_string(), format!("eq.{}", filter.value)));
        }
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        let request = self.client.get(self.table_url(table)).query(&params);
        self.send(table, request).await
    }

    async fn delete(&self, table: &'static str, id: Uuid) -> Result<(), StoreError> {
        debug!(table, %id, "deleting row");
        let request = Self::returning(
            self.client
                .delete(self.table_url(table))
                .query(&[("id", format!("eq.{id}"))]),
        );
        if self.send(table, request).await?.is_empty() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
