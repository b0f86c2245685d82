//! Entity stores: in-memory collections kept in lockstep with storage.
//!
//! # Responsibility
//! - Validate input and enforce uniqueness/lifecycle rules per entity.
//! - Persist the owning collection after every mutation.
//!
//! # Invariants
//! - A mutation is staged on a copy, persisted, then swapped in. A failed
//!   write leaves both memory and storage as they were.
//! - Stores hold no process-wide state; the caller owns every instance.

pub mod credential_store;
pub mod error;
pub mod group_store;
pub mod task_store;
