//! Opaque entity identifiers.
//!
//! Every stored record is keyed by a 24-character lowercase hex identifier,
//! matching the id shape of the original document store. Identifiers are
//! always generated server-side; client-supplied ids are never trusted.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;
use std::sync::LazyLock;
use thiserror::Error;
use utoipa::ToSchema;

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{24}$").expect("id pattern is valid"));

/// Error returned when a string does not have the expected identifier shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid identifier: expected 24 lowercase hex characters")]
pub struct InvalidIdError;

/// Opaque identifier for a stored entity.
///
/// Invariant: the inner string always matches `^[0-9a-f]{24}$`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Generate a fresh identifier from 12 random bytes.
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let mut hex = String::with_capacity(24);
        for byte in &uuid.as_bytes()[..12] {
            write!(hex, "{:02x}", byte).expect("writing to a String cannot fail");
        }
        Self(hex)
    }

    /// Parse an identifier, rejecting anything that is not 24 lowercase hex chars.
    pub fn parse(value: &str) -> Result<Self, InvalidIdError> {
        if ID_PATTERN.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(InvalidIdError)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix used as a slug disambiguator.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityId {
    type Error = InvalidIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}
