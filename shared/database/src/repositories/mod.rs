//! Repository abstraction over stored records.

pub mod memory;
pub mod mongo;

pub use memory::InMemoryRepository;
pub use mongo::MongoRepository;

use async_trait::async_trait;
use futures::stream::BoxStream;

use flexiflo_models::{DocumentKind, Record};
use flexiflo_utils::FlexifloResult;

/// Records in storage order.
pub type RecordStream<T> = BoxStream<'static, FlexifloResult<Record<T>>>;

/// CRUD over one collection of `T`.
///
/// Identifiers are 24-character hex ObjectIds; a malformed id fails with
/// `FlexifloError::InvalidId` before storage is touched. Implementations
/// re-check the model's `validator` invariants before every write.
#[async_trait]
pub trait DocumentRepository<T: DocumentKind>: Send + Sync {
    async fn insert(&self, document: T) -> FlexifloResult<Record<T>>;

    async fn find_all(&self) -> FlexifloResult<RecordStream<T>>;

    async fn find_by_id(&self, id: &str) -> FlexifloResult<Option<Record<T>>>;

    /// Replaces the stored document, keeping `createdAt` and stamping
    /// `updatedAt`. `None` when no record has the id.
    async fn update(&self, id: &str, document: T) -> FlexifloResult<Option<Record<T>>>;

    /// Removes the record and returns what was removed.
    async fn delete_by_id(&self, id: &str) -> FlexifloResult<Option<Record<T>>>;

    /// Whether the backing store is reachable.
    async fn ping(&self) -> FlexifloResult<()>;
}
