//! Input validation shared by the stores.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 4;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid username regex"));

/// Malformed user input. The caller is expected to re-prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    UsernameTooShort,
    UsernameInvalidChars,
    PasswordTooShort,
    EmptyGroupName,
    EmptyTaskText,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UsernameTooShort => write!(
                f,
                "username must have at least {MIN_USERNAME_CHARS} characters"
            ),
            Self::UsernameInvalidChars => write!(
                f,
                "username may only contain letters, digits and underscore"
            ),
            Self::PasswordTooShort => write!(
                f,
                "password must have at least {MIN_PASSWORD_CHARS} characters"
            ),
            Self::EmptyGroupName => write!(f, "group name must not be blank"),
            Self::EmptyTaskText => write!(f, "task text must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Checks a credential pair in the order users see the messages: username
/// length, password length, then username alphabet.
///
/// Lengths count UTF-16 code units, matching what legacy clients enforced.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), ValidationError> {
    if utf16_len(username) < MIN_USERNAME_CHARS {
        return Err(ValidationError::UsernameTooShort);
    }
    if utf16_len(password) < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Trims `value` and rejects it with `error` when nothing is left.
pub fn require_text(value: &str, error: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_string())
}

fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}
