//! Watchdog record schema.
//!
//! One line of a dump decodes into one [`Event`]. Only the presence and
//! shape of the required fields is checked; the values themselves are
//! opaque and passed through untouched.

use crate::utils::error::ParseError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque grouping key (pid, file, func or address)
///
/// The watchdog writes some of these as strings and some as integers;
/// both are normalized to their textual form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawKey", into = "String")]
pub struct Key(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawKey> for Key {
    fn from(raw: RawKey) -> Self {
        match raw {
            RawKey::Text(text) => Key(text),
            RawKey::Signed(n) => Key(n.to_string()),
            RawKey::Unsigned(n) => Key(n.to_string()),
        }
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl Key {
    pub fn new(value: impl Into<String>) -> Self {
        Key(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Old and new address of a reallocated block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Relocation {
    pub from: Key,
    pub to: Key,
}

/// Either a plain allocation-site address or a relocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Scalar(Key),
    Relocation(Relocation),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Scalar(key) => write!(f, "{}", key),
            Address::Relocation(Relocation { from, to }) => write!(f, "{} -> {}", from, to),
        }
    }
}

/// Sizes arrive as signed integers or as unsigned `size_t` values
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSize {
    Signed(i64),
    Unsigned(u64),
}

fn deserialize_size<'de, D>(deserializer: D) -> Result<i128, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawSize::deserialize(deserializer)? {
        RawSize::Signed(n) => i128::from(n),
        RawSize::Unsigned(n) => i128::from(n),
    })
}

/// A single allocation, free or reallocation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(alias = "PID")]
    pub pid: Key,
    pub file: Key,
    pub func: Key,
    pub line: i64,
    pub address: Address,
    /// Zero means freed; anything else is the live size in bytes
    #[serde(deserialize_with = "deserialize_size")]
    pub size: i128,
}

impl Event {
    /// Whether this record leaves the allocation outstanding
    pub fn is_live(&self) -> bool {
        self.size != 0
    }

    pub fn is_relocation(&self) -> bool {
        matches!(self.address, Address::Relocation(_))
    }

    /// Field/value pairs in display order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("pid", self.pid.to_string()),
            ("file", self.file.to_string()),
            ("func", self.func.to_string()),
            ("line", self.line.to_string()),
            ("address", self.address.to_string()),
            ("size", self.size.to_string()),
        ]
    }
}

/// Decode one serialized record
///
/// **Public** - main entry point for record decoding
///
/// # Errors
/// * `ParseError::MalformedRecord` - a required field is missing or has the
///   wrong shape. `line` is the 1-based position reported in the error.
pub fn decode_record(record: &str, line: usize) -> Result<Event, ParseError> {
    serde_json::from_str(record).map_err(|source| ParseError::MalformedRecord { line, source })
}
