//! MongoDB-backed repository.
//!
//! Documents are stored flat: the model's fields at the top level next to
//! `_id`, `createdAt` and `updatedAt`.

use std::marker::PhantomData;
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{StreamExt, TryStreamExt};
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::options::{FindOneAndReplaceOptions, ReturnDocument};
use mongodb::{Collection, Database};

use flexiflo_models::{DocumentKind, Record};
use flexiflo_utils::{parse_record_id, validate_model, FlexifloError, FlexifloResult};

use super::{DocumentRepository, RecordStream};

const CREATED_AT: &str = "createdAt";
const UPDATED_AT: &str = "updatedAt";

pub struct MongoRepository<T> {
    database: Database,
    collection: Collection<Document>,
    _kind: PhantomData<fn() -> T>,
}

impl<T: DocumentKind> MongoRepository<T> {
    pub fn new(database: &Database) -> Self {
        Self {
            database: database.clone(),
            collection: database.collection(T::COLLECTION),
            _kind: PhantomData,
        }
    }
}

fn now() -> bson::DateTime {
    bson::DateTime::now()
}

fn to_chrono(timestamp: bson::DateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(timestamp.to_system_time())
}

fn to_bson_time(timestamp: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_system_time(SystemTime::from(timestamp))
}

fn encode<T: DocumentKind>(
    document: &T,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
) -> FlexifloResult<Document> {
    let mut stored = bson::to_document(document)?;
    stored.remove("_id");
    stored.insert(CREATED_AT, created_at);
    stored.insert(UPDATED_AT, updated_at);
    Ok(stored)
}

fn decode<T: DocumentKind>(mut stored: Document) -> FlexifloResult<Record<T>> {
    let id = stored
        .get_object_id("_id")
        .map_err(|e| FlexifloError::persistence(format!("stored record has no _id: {}", e)))?;
    let created_at = timestamp(&stored, CREATED_AT)?;
    let updated_at = timestamp(&stored, UPDATED_AT)?;
    stored.remove("_id");
    stored.remove(CREATED_AT);
    stored.remove(UPDATED_AT);

    Ok(Record {
        id: id.to_hex(),
        document: bson::from_document(stored)?,
        created_at,
        updated_at,
    })
}

fn timestamp(stored: &Document, key: &str) -> FlexifloResult<DateTime<Utc>> {
    stored
        .get_datetime(key)
        .map(|t| to_chrono(*t))
        .map_err(|e| FlexifloError::persistence(format!("stored record has no {}: {}", key, e)))
}

#[async_trait]
impl<T: DocumentKind> DocumentRepository<T> for MongoRepository<T> {
    async fn insert(&self, document: T) -> FlexifloResult<Record<T>> {
        validate_model(&document)?;

        let stamp = now();
        let mut stored = encode(&document, stamp, stamp)?;
        let id = ObjectId::new();
        stored.insert("_id", id);

        self.collection.insert_one(stored, None).await?;
        tracing::debug!(collection = T::COLLECTION, id = %id, "Inserted record");

        Ok(Record {
            id: id.to_hex(),
            document,
            created_at: to_chrono(stamp),
            updated_at: to_chrono(stamp),
        })
    }

    async fn find_all(&self) -> FlexifloResult<RecordStream<T>> {
        let cursor = self.collection.find(None, None).await?;
        Ok(cursor
            .map_err(FlexifloError::from)
            .and_then(|stored| async move { decode::<T>(stored) })
            .boxed())
    }

    async fn find_by_id(&self, id: &str) -> FlexifloResult<Option<Record<T>>> {
        let id = parse_record_id(id)?;
        self.collection
            .find_one(doc! {"_id": id}, None)
            .await?
            .map(decode)
            .transpose()
    }

    async fn update(&self, id: &str, document: T) -> FlexifloResult<Option<Record<T>>> {
        let id = parse_record_id(id)?;
        validate_model(&document)?;

        let Some(existing) = self.find_by_id(&id.to_hex()).await? else {
            return Ok(None);
        };

        let replacement = encode(&document, to_bson_time(existing.created_at), now())?;
        let options = FindOneAndReplaceOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let replaced = self
            .collection
            .find_one_and_replace(doc! {"_id": id}, replacement, options)
            .await?;
        tracing::debug!(collection = T::COLLECTION, id = %id, found = replaced.is_some(), "Replaced record");

        replaced.map(decode).transpose()
    }

    async fn delete_by_id(&self, id: &str) -> FlexifloResult<Option<Record<T>>> {
        let id = parse_record_id(id)?;
        self.collection
            .find_one_and_delete(doc! {"_id": id}, None)
            .await?
            .map(decode)
            .transpose()
    }

    async fn ping(&self) -> FlexifloResult<()> {
        self.database.run_command(doc! {"ping": 1}, None).await?;
        Ok(())
    }
}
