use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store request timed out")]
    Timeout,

    #[error("store rejected a duplicate record: {0}")]
    Conflict(String),

    #[error("store authentication failed: {0}")]
    Auth(String),

    #[error("store error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode store response: {0}")]
    Decode(String),

    #[error("store unreachable: {0}")]
    Transport(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout => AppError::Timeout("document store timed out".to_string()),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            // The store rejecting our API key is an operational failure on
            // our side, never the caller's; Forbidden is reserved for the
            // caller's own credential checks.
            StoreError::Auth(msg) => {
                AppError::ExternalService(format!("store rejected credentials: {}", msg))
            }
            StoreError::Decode(msg) => AppError::Database(msg),
            StoreError::Api { status, message } => {
                AppError::ExternalService(format!("store error ({}): {}", status, message))
            }
            StoreError::Transport(msg) => AppError::ExternalService(msg),
        }
    }
}

/// HTTP client for the document store. The store speaks a PostgREST-style
/// protocol: collections are paths under /rest/v1 and filters are
/// exact-match equality query parameters.
pub struct StoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.store_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.store_url.clone(),
            api_key: config.store_api_key.clone(),
        }
    }

    fn headers(&self, returning: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.api_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).unwrap(),
        );

        if returning {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        headers
    }

    fn filter_path(collection: &str, filters: &[(&str, &str)]) -> String {
        let mut path = format!("/rest/v1/{}", collection);
        for (i, (field, value)) in filters.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            path.push_str(&format!("{}{}=eq.{}", sep, field, urlencoding::encode(value)));
        }
        path
    }

    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        returning: bool,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Store request: {} {}", method, url);

        let mut req = self.client.request(method, &url).headers(self.headers(returning));

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout
            } else {
                StoreError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Store error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::CONFLICT => StoreError::Conflict(error_text),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Auth(error_text),
                _ => StoreError::Api {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Fetch all records in a collection matching the equality filters.
    pub async fn find<T>(
        &self,
        collection: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = Self::filter_path(collection, filters);
        self.request(Method::GET, &path, None, false).await
    }

    /// Like `find`, but only the named columns are returned.
    pub async fn find_projected<T>(
        &self,
        collection: &str,
        filters: &[(&str, &str)],
        select: &str,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let mut path = Self::filter_path(collection, filters);
        let sep = if filters.is_empty() { '?' } else { '&' };
        path.push_str(&format!("{}select={}", sep, select));
        self.request(Method::GET, &path, None, false).await
    }

    pub async fn find_one<T>(
        &self,
        collection: &str,
        filters: &[(&str, &str)],
    ) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let records: Vec<T> = self.find(collection, filters).await?;
        Ok(records.into_iter().next())
    }

    /// Insert a record and return the stored representation. A store-level
    /// uniqueness violation comes back as `StoreError::Conflict`.
    pub async fn insert_one<T>(&self, collection: &str, body: Value) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", collection);
        let result: Vec<T> = self.request(Method::POST, &path, Some(body), true).await?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no representation".to_string()))
    }

    /// Idempotent partial update of the records matching the filters.
    /// Returns the number of records touched.
    pub async fn update_one(
        &self,
        collection: &str,
        filters: &[(&str, &str)],
        patch: Value,
    ) -> Result<u64, StoreError> {
        let path = Self::filter_path(collection, filters);
        let result: Vec<Value> = self.request(Method::PATCH, &path, Some(patch), true).await?;
        Ok(result.len() as u64)
    }

    /// Apply a patch to every record in the collection.
    pub async fn update_many(&self, collection: &str, patch: Value) -> Result<u64, StoreError> {
        self.update_one(collection, &[], patch).await
    }

    /// Delete the records matching the filters, returning how many went away.
    pub async fn delete_one(
        &self,
        collection: &str,
        filters: &[(&str, &str)],
    ) -> Result<u64, StoreError> {
        let path = Self::filter_path(collection, filters);
        let result: Vec<Value> = self.request(Method::DELETE, &path, None, true).await?;
        Ok(result.len() as u64)
    }
}
