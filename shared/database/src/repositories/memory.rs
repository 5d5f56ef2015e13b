//! Process-local repository.
//!
//! Keeps records in insertion order behind a tokio `RwLock`. Identifiers
//! are real ObjectIds, so id handling matches the MongoDB repository.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use flexiflo_models::{DocumentKind, Record};
use flexiflo_utils::{parse_record_id, validate_model, FlexifloResult};

use super::{DocumentRepository, RecordStream};

pub struct InMemoryRepository<T> {
    records: RwLock<Vec<Record<T>>>,
    _kind: PhantomData<fn() -> T>,
}

impl<T: DocumentKind> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            _kind: PhantomData,
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<T: DocumentKind> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: DocumentKind> DocumentRepository<T> for InMemoryRepository<T> {
    async fn insert(&self, document: T) -> FlexifloResult<Record<T>> {
        validate_model(&document)?;

        let now = Utc::now();
        let record = Record {
            id: ObjectId::new().to_hex(),
            document,
            created_at: now,
            updated_at: now,
        };
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_all(&self) -> FlexifloResult<RecordStream<T>> {
        let snapshot = self.records.read().await.clone();
        Ok(stream::iter(snapshot.into_iter().map(Ok)).boxed())
    }

    async fn find_by_id(&self, id: &str) -> FlexifloResult<Option<Record<T>>> {
        let id = parse_record_id(id)?.to_hex();
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn update(&self, id: &str, document: T) -> FlexifloResult<Option<Record<T>>> {
        let id = parse_record_id(id)?.to_hex();
        validate_model(&document)?;

        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        record.document = document;
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn delete_by_id(&self, id: &str) -> FlexifloResult<Option<Record<T>>> {
        let id = parse_record_id(id)?.to_hex();
        let mut records = self.records.write().await;
        let position = records.iter().position(|r| r.id == id);
        Ok(position.map(|index| records.remove(index)))
    }

    async fn ping(&self) -> FlexifloResult<()> {
        Ok(())
    }
}
