#![allow(dead_code)]
use std::cell::Cell;
use tarefas_core::db::DbError;
use tarefas_core::{KeyValueStore, KvWrite, SqliteKeyValueStore, StorageError, StorageResult};

/// Delegates to SQLite but can be told to fail every write.
pub struct FlakyStore<'conn> {
    inner: SqliteKeyValueStore<'conn>,
    fail_writes: Cell<bool>,
}

impl<'conn> FlakyStore<'conn> {
    pub fn new(conn: &'conn rusqlite::Connection) -> Self {
        Self {
            inner: SqliteKeyValueStore::try_new(conn).unwrap(),
            fail_writes: Cell::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl KeyValueStore for FlakyStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn write_batch(&self, writes: &[KvWrite<'_>]) -> StorageResult<()> {
        if self.fail_writes.get() {
            return Err(StorageError::Db(DbError::Sqlite(
                rusqlite::Error::InvalidQuery,
            )));
        }
        self.inner.write_batch(writes)
    }
}
