//! Entity identifiers.
//!
//! Ids are opaque strings. Records written by older clients carry the
//! creation instant in epoch milliseconds (`"1712345678901"`); new records
//! get a random UUID v4. Both forms load and compare the same way.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Returns a fresh collision-resistant id.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a [`Group`](crate::Group), unique per owner.
    GroupId
);

string_id!(
    /// Identifier of a [`Task`](crate::Task), unique within its scope.
    TaskId
);

#[cfg(test)]
mod tests {
    use super::{GroupId, TaskId};

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(TaskId::generate(), TaskId::generate());
        assert_ne!(GroupId::generate(), GroupId::generate());
    }

    #[test]
    fn legacy_millisecond_ids_serialize_as_plain_strings() {
        let id = GroupId::from("1712345678901");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1712345678901\"");
        let parsed: GroupId = serde_json::from_str("\"1712345678901\"").unwrap();
        assert_eq!(parsed, id);
    }
}
