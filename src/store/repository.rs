//! Repository traits for data access.
//!
//! Services only talk to these traits; [`super::InMemoryRepository`] is the
//! backend used by the binary and the tests.

use async_trait::async_trait;

use crate::error::{HrmsError, HrmsResult};

/// A typed filter over records of one entity.
///
/// Every field left unset matches all records.
pub trait RecordQuery<T>: Default + Send + Sync {
    /// Returns true if `record` satisfies every set criterion.
    fn matches(&self, record: &T) -> bool;
}

/// A persisted record type.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Entity name used in errors and logs.
    const NAME: &'static str;
    /// The typed filter accepted by [`Repository::find`].
    type Query: RecordQuery<Self>;
    /// The record's unique identifier.
    fn id(&self) -> &str;
}

/// Data access for records of one entity.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Finds a record by identifier.
    async fn get(&self, id: &str) -> HrmsResult<Option<T>>;

    /// Finds a record by identifier, failing with [`HrmsError::NotFound`].
    async fn require(&self, id: &str) -> HrmsResult<T> {
        self.get(id)
            .await?
            .ok_or_else(|| HrmsError::not_found(T::NAME, id))
    }

    /// Lists every record in insertion order.
    async fn list(&self) -> HrmsResult<Vec<T>>;

    /// Lists the records matching `query` in insertion order.
    async fn find(&self, query: &T::Query) -> HrmsResult<Vec<T>>;

    /// Returns the first record matching `query`.
    async fn find_one(&self, query: &T::Query) -> HrmsResult<Option<T>> {
        Ok(self.find(query).await?.into_iter().next())
    }

    /// Returns true if any record matches `query`.
    async fn exists(&self, query: &T::Query) -> HrmsResult<bool> {
        Ok(self.find_one(query).await?.is_some())
    }

    /// Inserts a new record.
    ///
    /// Fails with [`HrmsError::Store`] if the identifier is already taken.
    async fn create(&self, record: T) -> HrmsResult<T>;

    /// Replaces an existing record with the same identifier.
    ///
    /// Fails with [`HrmsError::NotFound`] if no such record exists.
    async fn update(&self, record: T) -> HrmsResult<T>;

    /// Removes a record.
    ///
    /// Fails with [`HrmsError::NotFound`] if no such record exists.
    async fn delete(&self, id: &str) -> HrmsResult<()>;
}
