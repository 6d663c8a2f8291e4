use async_trait::async_trait;
use serde_json::Value;

use crate::config::{CG_FIRESTORE_URL, FIREBASE_PROJECT_ID};
use crate::utils::get_client;

use super::errors::StoreError;
use super::store::DocumentStore;
use super::types::to_firestore_document;

const DEFAULT_DATABASE: &str = "(default)";

/// Document store backed by the Firestore REST API
#[derive(Debug, Clone)]
pub struct FirestoreDocumentStore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
}

impl FirestoreDocumentStore {
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let client = get_client().map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
        })
    }

    /// Build from `FIREBASE_PROJECT_ID` and `CG_FIRESTORE_URL`
    pub fn from_env() -> Result<Self, StoreError> {
        let project_id = FIREBASE_PROJECT_ID.as_ref().ok_or_else(|| {
            StoreError::NotConfigured("FIREBASE_PROJECT_ID is not set".to_string())
        })?;
        Self::new(CG_FIRESTORE_URL.as_str(), project_id.as_str())
    }

    fn document_url(&self, collection: &str, key: &str) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents/{}/{}",
            self.base_url,
            urlencoding::encode(&self.project_id),
            DEFAULT_DATABASE,
            urlencoding::encode(collection),
            urlencoding::encode(key)
        )
    }
}

async fn check_response(response: reqwest::Response) -> Result<(), StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    tracing::debug!("Firestore request failed with {}: {}", status, body);
    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            Err(StoreError::PermissionDenied(status.to_string()))
        }
        _ => Err(StoreError::Storage(format!("HTTP {status}"))),
    }
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    #[tracing::instrument(skip(self, record, id_token))]
    async fn write_document(
        &self,
        collection: &str,
        key: &str,
        record: &Value,
        id_token: &str,
    ) -> Result<(), StoreError> {
        let document = to_firestore_document(record)?;
        let response = self
            .client
            .patch(self.document_url(collection, key))
            .bearer_auth(id_token)
            .json(&document)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        check_response(response).await
    }

    #[tracing::instrument(skip(self, id_token))]
    async fn delete_document(
        &self,
        collection: &str,
        key: &str,
        id_token: &str,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.document_url(collection, key))
            .bearer_auth(id_token)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        check_response(response).await
    }
}
