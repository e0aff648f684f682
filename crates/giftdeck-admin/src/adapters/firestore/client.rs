//! Firestore REST client
//!
//! Thin wrapper over the `documents` endpoints used by the repositories:
//! `runQuery`, create with store-assigned id, and masked `PATCH`.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use thiserror::Error;

use giftdeck::DomainError;

use super::value::{Document, Filter, RunQueryRequest, RunQueryResponse, Value};
use crate::config::FirestoreConfig;

#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("Firestore project id is not configured")]
    MissingProject,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Firestore returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Malformed document {id}: {reason}")]
    Malformed { id: String, reason: String },
}

impl From<FirestoreError> for DomainError {
    fn from(err: FirestoreError) -> Self {
        match err {
            FirestoreError::Status { .. } => DomainError::ExternalService(err.to_string()),
            _ => DomainError::Repository(err.to_string()),
        }
    }
}

/// Client for one Firestore database
pub struct FirestoreClient {
    client: Client,
    documents_url: String,
    api_key: Option<String>,
    access_token: Option<String>,
}

impl FirestoreClient {
    pub fn new(config: &FirestoreConfig) -> Result<Self, FirestoreError> {
        let project_id = config
            .project_id
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(FirestoreError::MissingProject)?;

        Ok(Self {
            client: Client::new(),
            documents_url: documents_url(&config.base_url, project_id, &config.database),
            api_key: config.api_key.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Run a single-collection structured query
    pub async fn run_query(
        &self,
        collection: &str,
        filter: Filter,
    ) -> Result<Vec<Document>, FirestoreError> {
        let url = format!("{}:runQuery", self.documents_url);
        let body = RunQueryRequest::new(collection, filter);

        tracing::debug!(collection, "runQuery");
        let rows: Vec<RunQueryResponse> = self.send(self.client.post(&url).json(&body)).await?;

        Ok(rows.into_iter().filter_map(|row| row.document).collect())
    }

    /// Create a document with a store-assigned id
    pub async fn create_document(
        &self,
        collection: &str,
        fields: HashMap<String, Value>,
    ) -> Result<Document, FirestoreError> {
        let url = format!("{}/{}", self.documents_url, collection);
        let body = Document::with_fields(fields);

        tracing::debug!(collection, "createDocument");
        self.send(self.client.post(&url).json(&body)).await
    }

    /// Overwrite only the fields in `fields`
    pub async fn patch_document(
        &self,
        collection: &str,
        id: &str,
        fields: HashMap<String, Value>,
    ) -> Result<Document, FirestoreError> {
        let url = format!("{}/{}/{}", self.documents_url, collection, id);
        let mut mask: Vec<(&str, &str)> = fields
            .keys()
            .map(|field| ("updateMask.fieldPaths", field.as_str()))
            .collect();
        mask.sort();
        // Fail instead of creating the document when it does not exist
        mask.push(("currentDocument.exists", "true"));

        tracing::debug!(collection, id, "patchDocument");
        let request = self.client.patch(&url).query(&mask);
        self.send(request.json(&Document::with_fields(fields))).await
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, FirestoreError> {
        let resp = self.authorize(request).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(FirestoreError::Status { status, body });
        }

        Ok(resp.json().await?)
    }
}

fn documents_url(base_url: &str, project_id: &str, database: &str) -> String {
    format!(
        "{}/projects/{}/databases/{}/documents",
        base_url.trim_end_matches('/'),
        project_id,
        database
    )
}
