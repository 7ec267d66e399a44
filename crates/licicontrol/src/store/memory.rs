use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{ListQuery, RowStore, StoreError};

/// Process-local store used when no Supabase project is configured, and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<&'static str, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, HashMap<&'static str, Vec<Value>>>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

fn column_matches(row: &Value, column: &str, expected: &str) -> bool {
    match row.get(column) {
        Some(Value::String(value)) => value == expected,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == expected,
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn insert(&self, table: &'static str, row: Value) -> Result<Value, StoreError> {
        let mut tables = self.tables()?;
        let rows = tables.entry(table).or_default();
        let id = row_id(&row).map(str::to_string);
        if let Some(id) = id.as_deref() {
            if rows.iter().any(|existing| row_id(existing) == Some(id)) {
                return Err(StoreError::Conflict);
            }
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &'static str, id: Uuid, row: Value) -> Result<Value, StoreError> {
        let mut tables = self.tables()?;
        let id = id.to_string();
        let slot = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|existing| row_id(existing) == Some(&id)))
            .ok_or(StoreError::NotFound)?;
        *slot = row.clone();
        Ok(row)
    }

    async fn fetch(&self, table: &'static str, id: Uuid) -> Result<Option<Value>, StoreError> {
        let tables = self.tables()?;
        let id = id.to_string();
        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| row_id(row) == Some(&id)))
            .cloned())
    }

    async fn list(&self, table: &'static str, query: ListQuery) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables()?;
        let Some(rows) = tables.get(table) else {
            return Ok(Vec::new());
        };

        let matching = rows.iter().rev().filter(|row| match &query.filter {
            Some(filter) => column_matches(row, filter.column, &filter.value),
            None => true,
        });

        Ok(match query.limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        })
    }

    async fn delete(&self, table: &'static str, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        let id = id.to_string();
        let rows = tables.get_mut(table).ok_or(StoreError::NotFound)?;
        let before = rows.len();
        rows.retain(|row| row_id(row) != Some(&id));
        if rows.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
