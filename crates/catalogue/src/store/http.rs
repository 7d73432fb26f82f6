//! HTTP document store client.
//!
//! Speaks to the hosted document-store service over its JSON API.
//!
//! # API Reference
//!
//! - Collections: `GET`/`POST /collections/{collection}/documents`
//! - Documents: `GET`/`PATCH`/`PUT`/`DELETE /collections/{collection}/documents/{id}`
//! - Queries: `GET /collections/{collection}/documents?field=...&equals=...`
//! - Authentication: optional bearer token via `Authorization: Bearer <token>`

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use widelist_core::Fields;

use super::{Document, DocumentStore, StoreError};

/// Document store client backed by the hosted HTTP service.
#[derive(Clone)]
pub struct HttpStore {
    inner: Arc<HttpStoreInner>,
}

struct HttpStoreInner {
    client: reqwest::Client,
    base_url: String,
}

/// Wire shape of a stored document.
#[derive(Debug, Serialize, Deserialize)]
struct DocumentPayload {
    id: String,
    fields: Fields,
}

/// Wire shape of a create response.
#[derive(Debug, Deserialize)]
struct CreatedPayload {
    id: String,
}

/// Request body for writes that carry only fields.
#[derive(Debug, Serialize)]
struct FieldsPayload {
    fields: Fields,
}

impl From<DocumentPayload> for Document {
    fn from(payload: DocumentPayload) -> Self {
        Self {
            id: payload.id,
            fields: payload.fields,
        }
    }
}

impl HttpStore {
    /// Create a new client for the store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the token cannot be
    /// encoded as a header value.
    pub fn new(base_url: &str, token: Option<&SecretString>) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            let auth_value = format!("Bearer {}", token.expose_secret());
            headers.insert(
                "Authorization",
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| StoreError::Invalid(format!("Invalid token format: {e}")))?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpStoreInner {
                client,
                base_url: base_url.trim_end_matches('/').to_owned(),
            }),
        })
    }

    /// Get the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{collection}/documents", self.inner.base_url)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/collections/{collection}/documents/{id}",
            self.inner.base_url
        )
    }

    /// Parse a successful JSON response body.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| StoreError::Invalid(format!("Failed to parse response: {e}")));
        }

        Err(self.parse_error(response).await)
    }

    /// Check a response for writes whose body carries nothing useful.
    async fn expect_success(&self, response: reqwest::Response) -> Result<(), StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(self.parse_error(response).await)
    }

    /// Parse an error response from the store service.
    async fn parse_error(&self, response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        StoreError::Backend { status, message }
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let url = self.collection_url(collection);
        let response = self.inner.client.get(&url).send().await?;
        let payloads: Vec<DocumentPayload> = self.handle_response(response).await?;
        Ok(payloads.into_iter().map(Document::from).collect())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let url = self.document_url(collection, id);
        let response = self.inner.client.get(&url).send().await?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }

        let payload: DocumentPayload = self.handle_response(response).await?;
        Ok(Some(payload.into()))
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let url = self.collection_url(collection);
        let body = FieldsPayload { fields };
        let response = self.inner.client.post(&url).json(&body).send().await?;
        let created: CreatedPayload = self.handle_response(response).await?;
        Ok(created.id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let url = self.document_url(collection, id);
        let body = FieldsPayload { fields };
        let response = self.inner.client.patch(&url).json(&body).send().await?;

        if response.status().as_u16() == 404 {
            return Err(StoreError::not_found(collection, id));
        }

        self.expect_success(response).await
    }

    async fn upsert(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let url = self.document_url(collection, id);
        let body = FieldsPayload { fields };
        let response = self.inner.client.put(&url).json(&body).send().await?;
        self.expect_success(response).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let url = self.document_url(collection, id);
        let response = self.inner.client.delete(&url).send().await?;

        if response.status().as_u16() == 404 {
            return Err(StoreError::not_found(collection, id));
        }

        self.expect_success(response).await
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let url = self.collection_url(collection);
        let response = self
            .inner
            .client
            .get(&url)
            .query(&[("field", field), ("equals", value)])
            .send()
            .await?;
        let payloads: Vec<DocumentPayload> = self.handle_response(response).await?;
        Ok(payloads.into_iter().map(Document::from).collect())
    }
}

impl std::fmt::Debug for HttpStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStore")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
