//! Resource identifiers.
//!
//! The service hands out integer keys for most resources and UUIDs for events,
//! and older snapshots sent integer keys as strings. [`Id`] accepts all of them
//! and serializes numeric identifiers back as JSON numbers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Identifier of any service resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer form of the identifier, when it is one.
    ///
    /// Only canonical integers qualify: `"007"` stays a string.
    pub fn as_number(&self) -> Option<i64> {
        let n = self.0.parse::<i64>().ok()?;
        (n.to_string() == self.0).then_some(n)
    }

    /// Read an identifier out of an arbitrary JSON value.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_number() {
            Some(n) => serializer.serialize_i64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Signed(i64),
    Unsigned(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}
