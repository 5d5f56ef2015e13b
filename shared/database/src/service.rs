//! Validation and edit semantics in front of a repository.

use std::sync::Arc;

use futures::TryStreamExt;
use serde_json::Value;

use flexiflo_models::{merge_documents, DocumentKind, Record};
use flexiflo_utils::{FlexifloError, FlexifloResult};

use crate::repositories::DocumentRepository;

pub struct DocumentService<K: DocumentKind> {
    repository: Arc<dyn DocumentRepository<K>>,
}

impl<K: DocumentKind> Clone for DocumentService<K> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<K: DocumentKind> DocumentService<K> {
    pub fn new(repository: Arc<dyn DocumentRepository<K>>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<dyn DocumentRepository<K>> {
        &self.repository
    }

    /// Validates an untyped submission and stores it.
    pub async fn create(&self, input: &Value) -> FlexifloResult<Record<K>> {
        let document = K::from_input(input)?;
        let record = self.repository.insert(document).await?;
        tracing::info!(collection = K::COLLECTION, id = %record.id, "Created {}", K::LABEL);
        Ok(record)
    }

    pub async fn list(&self) -> FlexifloResult<Vec<Record<K>>> {
        self.repository.find_all().await?.try_collect().await
    }

    pub async fn get(&self, id: &str) -> FlexifloResult<Record<K>> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| FlexifloError::not_found(K::LABEL))
    }

    /// Merges `patch` over the stored document, validates the result as a
    /// whole and replaces the stored copy. Applying the same patch twice
    /// leaves the document as after the first time.
    pub async fn update(&self, id: &str, patch: &Value) -> FlexifloResult<Record<K>> {
        let existing = self.get(id).await?;

        let mut merged = serde_json::to_value(&existing.document)?;
        merge_documents(&mut merged, patch);
        let document = K::from_input(&merged)?;

        let record = self
            .repository
            .update(id, document)
            .await?
            .ok_or_else(|| FlexifloError::not_found(K::LABEL))?;
        tracing::info!(collection = K::COLLECTION, id = %record.id, "Updated {}", K::LABEL);
        Ok(record)
    }

    /// Removes the record and returns its list summary.
    pub async fn delete(&self, id: &str) -> FlexifloResult<K::Summary> {
        let record = self
            .repository
            .delete_by_id(id)
            .await?
            .ok_or_else(|| FlexifloError::not_found(K::LABEL))?;
        tracing::info!(collection = K::COLLECTION, id = %record.id, "Deleted {}", K::LABEL);
        Ok(record.summary())
    }

    pub async fn ping(&self) -> FlexifloResult<()> {
        self.repository.ping().await
    }
}
