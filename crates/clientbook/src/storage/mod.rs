//! Storage layer for clientbook.
//!
//! The repository persists its records as one serialized value under a
//! well-known key. This module defines the backing-store contract and two
//! implementations: a `SQLite` file for real use and an in-memory map for
//! tests and throwaway sessions.

pub mod schema;
mod sqlite;

use std::collections::HashMap;

use crate::error::Result;

pub use sqlite::{SqliteStore, StoreStats};

/// A key/value backing store.
///
/// A `write` must replace the whole value for `key` at once; a reader never
/// sees a partial value.
pub trait RecordStore {
    /// Read the value stored under `key`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
