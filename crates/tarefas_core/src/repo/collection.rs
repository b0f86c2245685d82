//! Whole-collection JSON codec over a [`KeyValueStore`].
//!
//! A missing key, an empty value and a JSON `null` all read as an empty
//! collection; anything else that fails to parse is a `Decode` error.

use crate::repo::kv_repo::{KeyValueStore, StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn load_collection<T, S>(kv: &S, key: &str) -> StorageResult<Vec<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = kv.get(key)? else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items = serde_json::from_str::<Option<Vec<T>>>(&raw).map_err(|source| {
        StorageError::Decode {
            key: key.to_string(),
            source,
        }
    })?;
    Ok(items.unwrap_or_default())
}

pub fn encode_collection<T: Serialize>(key: &str, items: &[T]) -> StorageResult<String> {
    serde_json::to_string(items).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })
}

pub fn save_collection<T, S>(kv: &S, key: &str, items: &[T]) -> StorageResult<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let encoded = encode_collection(key, items)?;
    kv.set(key, &encoded)
}
