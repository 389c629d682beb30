//! 256-bit token identifiers
//!
//! Token ids are opaque unsigned 256-bit integers held as 32-byte big-endian
//! words, the same width the leaf encoding and constructor-argument encoding
//! use. No arithmetic is ever performed on a token id.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::TypeError;

/// An unsigned 256-bit token identifier, big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId([u8; 32]);

impl TokenId {
    /// Create from a small id. Covers every realistically minted token.
    pub fn from_u128(value: u128) -> Self {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&value.to_be_bytes());
        Self(word)
    }

    /// Create from a full 32-byte big-endian word.
    pub fn from_be_bytes(word: [u8; 32]) -> Self {
        Self(word)
    }

    /// Get the 32-byte big-endian word.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl From<u128> for TokenId {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for TokenId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|_| TypeError::InvalidTokenId {
            input: s.to_string(),
        })?;
        let word: [u8; 32] = bytes.try_into().map_err(|_| TypeError::InvalidTokenId {
            input: s.to_string(),
        })?;
        Ok(Self(word))
    }
}

impl Serialize for TokenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
