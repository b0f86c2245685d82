//! Core entity layer for the Tarefas task manager.
//! Users, groups and tasks over a persistent key-value store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::group::Group;
pub use model::id::{GroupId, TaskId};
pub use model::task::{Task, TaskScope};
pub use model::timestamp::Timestamp;
pub use model::user::{password_checksum, User};
pub use model::validation::ValidationError;
pub use repo::kv_repo::{KeyValueStore, KvWrite, SqliteKeyValueStore, StorageError, StorageResult};
pub use store::credential_store::{CredentialStore, Session};
pub use store::error::{ErrorKind, StoreError, StoreResult};
pub use store::group_store::{GroupDeletion, GroupStore};
pub use store::task_store::{ResetRequest, TaskDeletion, TaskStore};

/// Minimal health-check API for front-end wiring checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
