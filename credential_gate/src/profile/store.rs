use async_trait::async_trait;
use serde_json::Value;

use super::errors::StoreError;

/// External document database holding profile records
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Create or replace the document at `collection/key`.
    ///
    /// `id_token` authenticates the write as the signed-in user.
    async fn write_document(
        &self,
        collection: &str,
        key: &str,
        record: &Value,
        id_token: &str,
    ) -> Result<(), StoreError>;

    async fn delete_document(
        &self,
        collection: &str,
        key: &str,
        id_token: &str,
    ) -> Result<(), StoreError>;
}
