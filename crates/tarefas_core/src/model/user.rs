//! Registered user record and the password checksum.
//!
//! # Invariants
//! - `password` never holds plaintext, only [`password_checksum`] output.
//! - Users are append-only: no update or delete path exists.

use crate::model::timestamp::{self, iso_millis, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Globally unique login name.
    pub username: String,
    /// Checksum of the plaintext password.
    pub password: String,
    #[serde(with = "iso_millis")]
    pub created_at: Timestamp,
}

impl User {
    /// Builds a user from plaintext credentials. Does not validate.
    pub fn new(username: impl Into<String>, plaintext_password: &str) -> Self {
        Self {
            username: username.into(),
            password: password_checksum(plaintext_password),
            created_at: timestamp::now(),
        }
    }

    pub fn verify_password(&self, plaintext_password: &str) -> bool {
        self.password == password_checksum(plaintext_password)
    }
}

/// Rolling 31-multiplier hash over UTF-16 code units with 32-bit signed
/// wraparound, rendered in base 10.
///
/// Not a password hash. It only keeps plaintext out of storage, and must
/// stay bit-for-bit stable so previously stored users can still log in.
pub fn password_checksum(password: &str) -> String {
    password
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{password_checksum, User};

    #[test]
    fn checksum_accumulates_shift_minus_self() {
        // (0 << 5) - 0 + 97 = 97, then (97 << 5) - 97 + 98 = 3105.
        assert_eq!(password_checksum("ab"), "3105");
    }

    #[test]
    fn checksum_of_empty_string_is_zero() {
        assert_eq!(password_checksum(""), "0");
    }

    #[test]
    fn checksum_wraps_at_32_bits() {
        assert_eq!(password_checksum("password"), "1216985755");
        assert_eq!(password_checksum("polygenelubricants"), "-2147483648");
    }

    #[test]
    fn checksum_hashes_utf16_code_units() {
        // U+1F600 is the surrogate pair D83D DE00.
        let expected = (0xD83Di32).wrapping_mul(31).wrapping_add(0xDE00);
        assert_eq!(password_checksum("\u{1F600}"), expected.to_string());
    }

    #[test]
    fn user_stores_checksum_not_plaintext() {
        let user = User::new("alice", "hunter2");
        assert_ne!(user.password, "hunter2");
        assert!(user.verify_password("hunter2"));
        assert!(!user.verify_password("hunter3"));
    }
}
