//! Compact, time-ordered identifiers.
//!
//! A [`CompactId`] is the concatenation of a millisecond timestamp and a random
//! component, both rendered in base 36. Both parts come from a UUIDv7, which
//! keeps ids monotonic within the process even when several are minted in the
//! same millisecond.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Width of the timestamp component (36^9 ms covers well past year 5000).
const TIMESTAMP_WIDTH: usize = 9;

/// Width of the random component (36^15 > 2^74).
const RANDOM_WIDTH: usize = 15;

/// Opaque identifier: `<timestamp base36><random base36>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompactId(String);

impl CompactId {
    /// Mint a fresh identifier.
    ///
    /// No uniqueness check is performed against existing ids; the random
    /// component makes collisions vanishingly unlikely.
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::now_v7())
    }

    /// Derive the compact form of a UUIDv7 (deterministic, handy in tests).
    pub fn from_uuid(uuid: Uuid) -> Self {
        let bits = uuid.as_u128();

        // UUIDv7 layout: 48 bits unix_ts_ms | 4 version | 12 rand_a | 2 variant | 62 rand_b.
        let timestamp = bits >> 80;
        let rand_a = (bits >> 64) & 0x0fff;
        let rand_b = bits & ((1u128 << 62) - 1);
        let random = (rand_a << 62) | rand_b;

        let mut out = String::with_capacity(TIMESTAMP_WIDTH + RANDOM_WIDTH);
        out.push_str(&pad(encode_base36(timestamp), TIMESTAMP_WIDTH));
        out.push_str(&pad(encode_base36(random), RANDOM_WIDTH));
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Render `value` in lowercase base 36 (no padding).
pub fn encode_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    // Every byte comes from ALPHABET.
    digits.into_iter().map(char::from).collect()
}

fn pad(s: String, width: usize) -> String {
    format!("{s:0>width$}")
}

impl core::fmt::Display for CompactId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CompactId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(DomainError::invalid_id("CompactId: empty"));
        }
        // Accept ids minted by older clients too (any url-safe token).
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(DomainError::invalid_id(format!(
                "CompactId: unexpected character {c:?}"
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for CompactId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CompactId> for String {
    fn from(value: CompactId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(encode_base36(0), "0");
        assert_eq!(encode_base36(35), "z");
        assert_eq!(encode_base36(36), "10");
        assert_eq!(encode_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn generated_ids_have_fixed_width_and_compact_alphabet() {
        let id = CompactId::generate();
        assert_eq!(id.as_str().len(), TIMESTAMP_WIDTH + RANDOM_WIDTH);
        assert!(id.as_str().bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn generated_ids_are_unique_and_time_ordered() {
        let ids: Vec<CompactId> = (0..10_000).map(|_| CompactId::generate()).collect();

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());

        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(sorted, ids);
    }

    #[test]
    fn timestamp_component_comes_from_uuid() {
        let uuid = Uuid::from_u128(0x018b_cfe5_6800_7000_8000_0000_0000_0001);
        let id = CompactId::from_uuid(uuid);
        assert_eq!(&id.as_str()[..TIMESTAMP_WIDTH], "0loyw3v28");
        assert_eq!(&id.as_str()[TIMESTAMP_WIDTH..], "000000000000001");
    }

    #[test]
    fn parse_accepts_legacy_ids_and_rejects_garbage() {
        assert!("lq2x9k3abc123def".parse::<CompactId>().is_ok());
        assert!(matches!("".parse::<CompactId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!("  ".parse::<CompactId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!("a b".parse::<CompactId>(), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn serde_uses_plain_string() {
        let id: CompactId = "abc123".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc123\"");
        let back: CompactId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<CompactId>("\"\"").is_err());
    }
}
