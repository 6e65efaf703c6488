//! Session identity.
//!
//! Every upload gets a fresh [`SessionToken`]; all artifacts produced for that
//! upload are namespaced by it. Tokens are random UUIDs, so they are safe to embed
//! in file names and cannot be guessed from one another.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Opaque identifier of one upload-to-download cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionToken(Uuid);

/// Error returned when a string is not a valid session token.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid session token: {0}")]
pub struct InvalidToken(pub String);

impl SessionToken {
    /// Generates a new random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Prefix shared by every artifact file name of this session.
    pub fn file_prefix(&self) -> String {
        format!("{}_", self)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for SessionToken {
    type Err = InvalidToken;

    /// Only the canonical hyphenated form is accepted, which keeps client supplied
    /// ids from ever carrying path separators into the artifact store.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::try_parse(s).map_err(|_| InvalidToken(s.to_string()))?;
        let token = Self(uuid);
        if token.to_string() != s.to_ascii_lowercase() {
            return Err(InvalidToken(s.to_string()));
        }
        Ok(token)
    }
}

impl TryFrom<String> for SessionToken {
    type Error = InvalidToken;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionToken> for String {
    fn from(token: SessionToken) -> Self {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique() {
        let a = SessionToken::generate();
        let b = SessionToken::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_roundtrip_through_string() {
        let token = SessionToken::generate();
        let parsed: SessionToken = token.to_string().parse().unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_rejects_path_like_ids() {
        assert!("../../etc/passwd".parse::<SessionToken>().is_err());
        assert!("abc".parse::<SessionToken>().is_err());
        assert!("".parse::<SessionToken>().is_err());
    }

    #[test]
    fn test_rejects_non_hyphenated_forms() {
        let simple = Uuid::new_v4().simple().to_string();
        assert!(simple.parse::<SessionToken>().is_err());
        let braced = format!("{{{}}}", Uuid::new_v4());
        assert!(braced.parse::<SessionToken>().is_err());
    }

    #[test]
    fn test_file_prefix() {
        let token: SessionToken = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(token.file_prefix(), "550e8400-e29b-41d4-a716-446655440000_");
    }
}
