//! Domain records persisted by the stores.
//!
//! # Invariants
//! - Records serialize with camelCase field names and ISO-8601 timestamps,
//!   so collections written by earlier clients keep loading.
//! - Constructors do not validate; stores normalize input first.

pub mod group;
pub mod id;
pub mod task;
pub mod timestamp;
pub mod user;
pub mod validation;
