//! Row storage for the procurement tables.
//!
//! [`RowStore`] is deliberately untyped (JSON rows keyed by table name) so that the Supabase
//! PostgREST backend and the in-memory backend share one object-safe seam. Workflows talk to
//! the typed [`Repository`] wrapper instead.

mod memory;
mod postgrest;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// A row type persisted in one table, identified by a UUID `id` column.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const TABLE: &'static str;

    fn id(&self) -> Uuid;
}

/// Equality filter on a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: &'static str,
    pub value: String,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl ToString) -> Self {
        Self {
            column,
            value: value.to_string(),
        }
    }
}

/// Listing options. Rows always come back newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: Option<Filter>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filtered(filter: Filter) -> Self {
        Self {
            filter: Some(filter),
            limit: None,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait RowStore: Send + Sync {
    async fn insert(&self, table: &'static str, row: Value) -> Result<Value, StoreError>;
    async fn update(&self, table: &'static str, id: Uuid, row: Value) -> Result<Value, StoreError>;
    async fn fetch(&self, table: &'static str, id: Uuid) -> Result<Option<Value>, StoreError>;
    async fn list(&self, table: &'static str, query: ListQuery) -> Result<Vec<Value>, StoreError>;
    async fn delete(&self, table: &'static str, id: Uuid) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("row does not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Typed view over one table of a [`RowStore`].
pub struct Repository<T> {
    store: Arc<dyn RowStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub async fn insert(&self, record: &T) -> Result<T, StoreError> {
        let row = self.store.insert(T::TABLE, serde_json::to_value(record)?).await?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn update(&self, record: &T) -> Result<T, StoreError> {
        let row = self
            .store
            .update(T::TABLE, record.id(), serde_json::to_value(record)?)
            .await?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn fetch(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        match self.store.fetch(T::TABLE, id).await? {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    pub async fn require(&self, id: Uuid) -> Result<T, StoreError> {
        self.fetch(id).await?.ok_or(StoreError::NotFound)
    }

    pub async fn list(&self, query: ListQuery) -> Result<Vec<T>, StoreError> {
        self.store
            .list(T::TABLE, query)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }

    pub async fn first_where(&self, filter: Filter) -> Result<Option<T>, StoreError> {
        let mut rows = self.list(ListQuery::filtered(filter).limit(1)).await?;
        Ok(rows.pop())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.store.delete(T::TABLE, id).await
    }
}
