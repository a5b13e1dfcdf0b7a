//! REST client for the hosted data platform (PostgREST tables + storage).
//!
//! Tables live under `{url}/rest/v1/{table}`, objects under
//! `{url}/storage/v1/object/{bucket}/{path}`. Every request carries the
//! project's API key as both `apikey` and bearer token.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Url};
use serde_json::Value;

use crate::backend::{Filter, ObjectStore, Order, TableStore, UploadOptions};
use crate::error::BackendError;

const PREFER_RETURN: &str = "return=representation";
const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=representation";

/// Connection settings for the hosted platform.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Anonymous (or service) API key.
    pub api_key: String,
    /// Storage bucket for avatars and media.
    pub bucket: String,
}

/// HTTP client for one project and bucket.
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl SupabaseClient {
    /// Build a client with default headers carrying the API key.
    pub fn new(config: &SupabaseConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key).map_err(|e| BackendError::Api {
            status: 0,
            code: None,
            message: format!("Invalid API key header: {e}"),
        })?;
        let bearer =
            HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|e| {
                BackendError::Api {
                    status: 0,
                    code: None,
                    message: format!("Invalid API key header: {e}"),
                }
            })?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`]. The caller is
    /// responsible for the API key headers.
    pub fn with_client(client: reqwest::Client, config: &SupabaseConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Object URL with each path segment percent-encoded.
    fn object_url(&self, path: &str) -> Result<Url, BackendError> {
        let mut url = self.storage_object_root()?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Api {
                status: 0,
                code: None,
                message: format!("Base URL cannot hold a path: {}", self.base_url),
            })?
            .push(&self.bucket)
            .extend(path.split('/'));
        Ok(url)
    }

    fn storage_object_root(&self) -> Result<Url, BackendError> {
        Url::parse(&format!("{}/storage/v1/object", self.base_url)).map_err(|e| {
            BackendError::Api {
                status: 0,
                code: None,
                message: format!("Invalid platform URL '{}': {e}", self.base_url),
            }
        })
    }

    fn table_request(&self, method: Method, table: &str, filters: &[Filter]) -> RequestBuilder {
        let query: Vec<(String, String)> = filters.iter().map(Filter::to_postgrest).collect();
        self.client
            .request(method, self.table_url(table))
            .query(&query)
    }

    fn require_filters(table: &str, filters: &[Filter]) -> Result<(), BackendError> {
        if filters.is_empty() {
            return Err(BackendError::Unfiltered {
                table: table.to_string(),
            });
        }
        Ok(())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, turning the error
    /// body into a [`BackendError::Api`] otherwise.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BackendError::from_response_body(status.as_u16(), &body));
        }
        Ok(response)
    }

    /// Parse a successful response as a JSON array of rows.
    async fn parse_rows(response: reqwest::Response) -> Result<Vec<Value>, BackendError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<Vec<Value>>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), BackendError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl TableStore for SupabaseClient {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<Value>, BackendError> {
        let mut request = self
            .table_request(Method::GET, table, filters)
            .query(&[("select", "*")]);
        if let Some(order) = order {
            request = request.query(&[("order", order.to_postgrest())]);
        }
        tracing::debug!(table, filters = filters.len(), "select");
        Self::parse_rows(request.send().await?).await
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, BackendError> {
        tracing::debug!(table, rows = rows.len(), "insert");
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", PREFER_RETURN)
            .json(&rows)
            .send()
            .await?;
        Self::parse_rows(response).await
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, BackendError> {
        Self::require_filters(table, filters)?;
        tracing::debug!(table, filters = filters.len(), "update");
        let response = self
            .table_request(Method::PATCH, table, filters)
            .header("Prefer", PREFER_RETURN)
            .json(&patch)
            .send()
            .await?;
        Self::parse_rows(response).await
    }

    async fn upsert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, BackendError> {
        tracing::debug!(table, rows = rows.len(), "upsert");
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", PREFER_UPSERT)
            .json(&rows)
            .send()
            .await?;
        Self::parse_rows(response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, BackendError> {
        Self::require_filters(table, filters)?;
        tracing::debug!(table, filters = filters.len(), "delete");
        let response = self
            .table_request(Method::DELETE, table, filters)
            .header("Prefer", PREFER_RETURN)
            .send()
            .await?;
        Self::parse_rows(response).await
    }
}

#[async_trait]
impl ObjectStore for SupabaseClient {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(
        &self,
        path: &str,
        body: Bytes,
        options: &UploadOptions,
    ) -> Result<(), BackendError> {
        let mut request = self
            .client
            .post(self.object_url(path)?)
            .header(CONTENT_TYPE, options.content_type.as_str())
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(body);
        if let Some(secs) = options.cache_control_secs {
            request = request.header(CACHE_CONTROL, format!("max-age={secs}"));
        }
        tracing::debug!(bucket = %self.bucket, path, upsert = options.upsert, "upload");
        Self::check_status(request.send().await?).await
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.base_url, self.bucket
        )
    }

    async fn remove(&self, paths: &[String]) -> Result<(), BackendError> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut url = self.storage_object_root()?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Api {
                status: 0,
                code: None,
                message: format!("Base URL cannot hold a path: {}", self.base_url),
            })?
            .push(&self.bucket);
        tracing::debug!(bucket = %self.bucket, count = paths.len(), "remove");
        let response = self
            .client
            .delete(url)
            .json(&serde_json::json!({ "prefixes": paths }))
            .send()
            .await?;
        Self::check_status(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SupabaseClient {
        SupabaseClient::new(&SupabaseConfig {
            url: "https://abc.supabase.co/".to_string(),
            api_key: "anon-key".to_string(),
            bucket: "lab-upload".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn public_url_joins_base_bucket_and_path() {
        assert_eq!(
            client().public_url("media/a1/x.png"),
            "https://abc.supabase.co/storage/v1/object/public/lab-upload/media/a1/x.png"
        );
    }

    #[test]
    fn object_url_encodes_segments() {
        let url = client().object_url("media/a1/set list.pdf").unwrap();
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/storage/v1/object/lab-upload/media/a1/set%20list.pdf"
        );
    }

    #[test]
    fn table_url_under_rest_v1() {
        assert_eq!(
            client().table_url("artists"),
            "https://abc.supabase.co/rest/v1/artists"
        );
    }

    #[test]
    fn rejects_invalid_api_key_header() {
        let result = SupabaseClient::new(&SupabaseConfig {
            url: "https://abc.supabase.co".to_string(),
            api_key: "bad\nkey".to_string(),
            bucket: "lab-upload".to_string(),
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn unfiltered_delete_is_refused_before_any_request() {
        let err = client().delete("artists", &[]).await.unwrap_err();
        assert!(matches!(err, BackendError::Unfiltered { .. }));
    }
}
