//! Task group owned by one user.

use crate::model::id::GroupId;
use crate::model::timestamp::{self, iso_millis, iso_millis_option, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    /// Trimmed, unique among the owner's groups.
    pub name: String,
    #[serde(with = "iso_millis")]
    pub created_at: Timestamp,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "iso_millis_option"
    )]
    pub updated_at: Option<Timestamp>,
    /// Owning user.
    pub username: String,
}

impl Group {
    /// Creates a group with a fresh id. `name` is expected to be normalized.
    pub fn new(name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: GroupId::generate(),
            name: name.into(),
            created_at: timestamp::now(),
            updated_at: None,
            username: username.into(),
        }
    }

    /// Replaces the name and stamps `updated_at`.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Some(timestamp::now());
    }
}
