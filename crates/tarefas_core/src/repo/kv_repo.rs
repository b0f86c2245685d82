//! Key-value storage contract and its SQLite implementation.
//!
//! # Responsibility
//! - Map string keys to string values, the shape every store persists in.
//! - Offer an atomic multi-key write for operations that touch several keys.
//!
//! # Invariants
//! - A write batch is applied entirely or not at all.
//! - Removing an absent key is not an error.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

const KV_TABLE: &str = "kv_entries";

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence failure. Not a domain error: callers surface it as-is.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Collection could not be serialized for `key`.
    Encode {
        key: String,
        source: serde_json::Error,
    },
    /// Value stored under `key` is not a valid collection.
    Decode {
        key: String,
        source: serde_json::Error,
    },
    /// Connection was not migrated to the version this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
            Self::Decode { key, source } => {
                write!(f, "invalid persisted data under `{key}`: {source}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "key-value store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "key-value store requires table `{table}`")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } | Self::Decode { source, .. } => Some(source),
            Self::UninitializedConnection { .. } | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One write inside [`KeyValueStore::write_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvWrite<'a> {
    Put { key: &'a str, value: &'a str },
    Remove { key: &'a str },
}

/// Synchronous string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Applies all writes atomically, in order.
    fn write_batch(&self, writes: &[KvWrite<'_>]) -> StorageResult<()>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.write_batch(&[KvWrite::Put { key, value }])
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.write_batch(&[KvWrite::Remove { key }])
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn write_batch(&self, writes: &[KvWrite<'_>]) -> StorageResult<()> {
        (**self).write_batch(writes)
    }
}

/// SQLite-backed store over the `kv_entries` table.
///
/// Cheap to copy; every store can hold its own handle to one connection.
#[derive(Debug, Clone, Copy)]
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection after checking it was opened through
    /// [`crate::db::open_db`] or [`crate::db::open_db_in_memory`].
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_kv_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_batch(&self, writes: &[KvWrite<'_>]) -> StorageResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for write in writes {
            match write {
                KvWrite::Put { key, value } => {
                    tx.execute(
                        "INSERT INTO kv_entries (key, value, updated_at)
                         VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                         ON CONFLICT(key) DO UPDATE SET
                            value = excluded.value,
                            updated_at = excluded.updated_at;",
                        params![*key, *value],
                    )?;
                }
                KvWrite::Remove { key } => {
                    tx.execute("DELETE FROM kv_entries WHERE key = ?1;", [*key])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn ensure_kv_connection_ready(conn: &Connection) -> StorageResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(StorageError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(StorageError::MissingRequiredTable(KV_TABLE));
    }

    Ok(())
}
