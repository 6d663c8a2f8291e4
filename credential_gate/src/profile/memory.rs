use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::errors::StoreError;
use super::store::DocumentStore;

#[derive(Default)]
struct Inner {
    documents: HashMap<String, Value>,
    writes: usize,
    deletes: usize,
    failure: Option<StoreError>,
    // store the document even though the write reports `failure`
    commit_on_failure: bool,
}

/// In-process document store for tests and offline demos
#[derive(Default)]
pub struct InMemoryDocumentStore {
    inner: Mutex<Inner>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory document store");
        Self::default()
    }

    fn make_key(collection: &str, key: &str) -> String {
        format!("{collection}/{key}")
    }

    pub async fn get_document(&self, collection: &str, key: &str) -> Option<Value> {
        self.inner
            .lock()
            .await
            .documents
            .get(&Self::make_key(collection, key))
            .cloned()
    }

    /// Number of write attempts, including failed ones
    pub async fn write_count(&self) -> usize {
        self.inner.lock().await.writes
    }

    pub async fn document_count(&self) -> usize {
        self.inner.lock().await.documents.len()
    }

    pub async fn delete_count(&self) -> usize {
        self.inner.lock().await.deletes
    }

    /// Make every write fail with `error` until cleared
    pub async fn fail_writes(&self, error: StoreError) {
        let mut inner = self.inner.lock().await;
        inner.failure = Some(error);
        inner.commit_on_failure = false;
    }

    /// Like `fail_writes`, but the documents are stored anyway, as when a
    /// response is lost after the database committed the write
    pub async fn fail_writes_after_commit(&self, error: StoreError) {
        let mut inner = self.inner.lock().await;
        inner.failure = Some(error);
        inner.commit_on_failure = true;
    }

    pub async fn clear_failure(&self) {
        let mut inner = self.inner.lock().await;
        inner.failure = None;
        inner.commit_on_failure = false;
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn write_document(
        &self,
        collection: &str,
        key: &str,
        record: &Value,
        _id_token: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.writes += 1;
        if inner.failure.is_none() || inner.commit_on_failure {
            inner
                .documents
                .insert(Self::make_key(collection, key), record.clone());
        }
        match &inner.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn delete_document(
        &self,
        collection: &str,
        key: &str,
        _id_token: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.deletes += 1;
        inner.documents.remove(&Self::make_key(collection, key));
        Ok(())
    }
}
