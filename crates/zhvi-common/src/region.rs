//! Region keys: five-character, zero-padded ZIP codes.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{ZhviError, ZhviResult};

/// Width every region key is padded to.
pub const REGION_KEY_LEN: usize = 5;

/// Placeholder key that is never stored.
const PLACEHOLDER: &str = "00000";

/// A normalized postal code used as the lookup store key.
///
/// Always exactly [`REGION_KEY_LEN`] characters, left-padded with `0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionKey(String);

impl RegionKey {
    /// Parse and normalize a caller-supplied ZIP code.
    ///
    /// `"123"` and `"00123"` yield the same key. Input must be one to five
    /// ASCII digits after trimming.
    pub fn parse(raw: &str) -> ZhviResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.len() > REGION_KEY_LEN
            || !trimmed.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ZhviError::InvalidRegionKey(raw.to_string()));
        }
        Ok(Self(Self::pad(trimmed)))
    }

    /// Left-pad a raw `RegionName` cell to the key width.
    ///
    /// This is the CSV-side coercion: no digit check and no truncation, so a
    /// value already wider than the key width comes back unchanged.
    pub fn pad(raw: &str) -> String {
        format!("{:0>width$}", raw.trim(), width = REGION_KEY_LEN)
    }

    /// Build a key from an already padded CSV value.
    ///
    /// Returns `None` unless the value is exactly [`REGION_KEY_LEN`] ASCII
    /// digits. The `00000` placeholder is a valid key here; callers that must
    /// not store it check [`RegionKey::is_placeholder`].
    pub fn from_padded(padded: &str) -> Option<Self> {
        if padded.len() != REGION_KEY_LEN || !padded.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self(padded.to_string()))
    }

    /// True for the all-zero placeholder key.
    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RegionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for RegionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pads_short_codes() {
        let short = RegionKey::parse("123").unwrap();
        let full = RegionKey::parse("00123").unwrap();
        assert_eq!(short, full);
        assert_eq!(short.as_str(), "00123");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(RegionKey::parse(" 90210 ").unwrap().as_str(), "90210");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(RegionKey::parse("").is_err());
        assert!(RegionKey::parse("123456").is_err());
        assert!(RegionKey::parse("12a45").is_err());
        assert!(RegionKey::parse("-1234").is_err());
    }

    #[test]
    fn test_parse_allows_placeholder_but_flags_it() {
        let key = RegionKey::parse("0").unwrap();
        assert!(key.is_placeholder());
    }

    #[test]
    fn test_pad_matches_csv_coercion() {
        assert_eq!(RegionKey::pad("501"), "00501");
        assert_eq!(RegionKey::pad("90210"), "90210");
        assert_eq!(RegionKey::pad(""), "00000");
        assert_eq!(RegionKey::pad("1234567"), "1234567");
    }

    #[test]
    fn test_from_padded_requires_five_digits() {
        assert!(RegionKey::from_padded("123456").is_none());
        assert!(RegionKey::from_padded("ABCDE").is_none());
        assert!(RegionKey::from_padded("1234 ").is_none());
        assert_eq!(RegionKey::from_padded("02108").unwrap().as_str(), "02108");
        assert!(RegionKey::from_padded("00000").unwrap().is_placeholder());
    }

    #[test]
    fn test_serializes_as_string() {
        let key = RegionKey::parse("501").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"00501\"");
    }
}
