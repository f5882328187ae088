//! PostgREST data store implementation.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;

use haven_core::storage::{DataStore, Entity, Filter, Query, RepositoryError, Result, Row};

use super::error::{map_reqwest_error, map_status};

/// HTTP client for a PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PostgrestStore {
    /// Creates a store for the project at `base_url` (without `/rest/v1`).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, entity: Entity) -> String {
        format!("{}/rest/v1/{}", self.base_url, entity)
    }

    fn request(&self, method: Method, entity: Entity) -> RequestBuilder {
        self.client
            .request(method, self.table_url(entity))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Decodes the row array PostgREST returns with `return=representation`.
    async fn rows(response: Response) -> Result<Vec<Row>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, &body));
        }
        response.json().await.map_err(map_reqwest_error)
    }

    async fn write(
        &self,
        method: Method,
        entity: Entity,
        filters: &[Filter],
        body: Option<Row>,
    ) -> Result<u64> {
        // PostgREST would apply an unfiltered write to the whole table.
        if filters.is_empty() {
            return Err(RepositoryError::InvalidData(format!(
                "refusing unfiltered {method} on {entity}"
            )));
        }

        let mut request = self
            .request(method, entity)
            .query(&filter_params(filters))
            .header("Prefer", "return=representation");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        Ok(Self::rows(response).await?.len() as u64)
    }
}

#[async_trait]
impl DataStore for PostgrestStore {
    async fn select(&self, query: &Query) -> Result<Vec<Row>> {
        let mut params = vec![("select".to_string(), select_param(query))];
        params.extend(filter_params(&query.filters));

        let response = self
            .request(Method::GET, query.entity)
            .query(&params)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Self::rows(response).await
    }

    async fn insert(&self, entity: Entity, rows: Vec<Row>) -> Result<Vec<Row>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .request(Method::POST, entity)
            .header("Prefer", "return=representation")
            .json(&rows)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Self::rows(response).await
    }

    async fn update(&self, entity: Entity, filters: &[Filter], changes: Row) -> Result<u64> {
        self.write(Method::PATCH, entity, filters, Some(changes)).await
    }

    async fn delete(&self, entity: Entity, filters: &[Filter]) -> Result<u64> {
        self.write(Method::DELETE, entity, filters, None).await
    }
}

fn select_param(query: &Query) -> String {
    if query.columns.is_empty() {
        "*".to_string()
    } else {
        query.columns.join(",")
    }
}

/// Renders filters as PostgREST query parameters.
fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|filter| {
            let value = match filter {
                Filter::Eq(_, value) => format!("eq.{}", render_value(value)),
                Filter::In(_, values) => format!(
                    "in.({})",
                    values
                        .iter()
                        .map(render_list_item)
                        .collect::<Vec<_>>()
                        .join(",")
                ),
            };
            (filter.column().to_string(), value)
        })
        .collect()
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Strings with list delimiters must be double-quoted inside `in.(...)`.
fn render_list_item(value: &Value) -> String {
    match value {
        Value::String(s) if s.contains([',', '(', ')', '"', '\\']) => {
            format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
        }
        other => render_value(other),
    }
}
