//! 12-byte document identifiers rendered as 24 hex characters.
//!
//! Layout: 4-byte big-endian unix timestamp, 5 bytes of per-process randomness,
//! 3-byte big-endian counter seeded randomly at startup.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};

/// Compiled regex for the textual identifier format.
static OBJECT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").unwrap());

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(rand::random);

static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| AtomicU32::new(rand::random::<u32>()));

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("`{0}` is not a valid object id")]
pub struct InvalidObjectId(pub String);

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        let mut bytes = [0u8; 12];

        let secs = chrono::Utc::now().timestamp() as u32;
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);

        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        Self(bytes)
    }

    /// Checks the textual format only; says nothing about existence.
    pub fn is_valid(value: &str) -> bool {
        OBJECT_ID_REGEX.is_match(value)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Seconds since the unix epoch encoded in the id.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_valid(s) {
            return Err(InvalidObjectId(s.to_string()));
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| InvalidObjectId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
