//! Persistence layer: key-value contract, key layout and collection codec.
//!
//! # Invariants
//! - Stores persist whole collections; there are no partial row updates.
//! - Decoding failures surface as `StorageError::Decode`, never as an empty
//!   collection.

pub mod collection;
pub mod keys;
pub mod kv_repo;
