use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Canonical opaque patient identifier (lowercase, hyphenated).
///
/// Once constructed the contained UUID is known to be valid, and its string form is always the
/// canonical one, so it can be compared and stored as text without normalisation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PatientUuid(Uuid);

impl Default for PatientUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientUuid {
    const CANONICAL_LEN: usize = 36;

    /// Allocates a fresh random (version 4) identifier for a new patient.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// Uppercase, braced, URN and unhyphenated forms are rejected rather than normalised.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not canonical.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "patient UUID must be 36 lowercase hyphenated hex characters, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(e.to_string()))
    }

    /// Returns true if `input` is a lowercase hyphenated UUID.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == Self::CANONICAL_LEN
            && input.bytes().enumerate().all(|(i, b)| match i {
                8 | 13 | 18 | 23 => b == b'-',
                _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
            })
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for PatientUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for PatientUuid {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatientUuid::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PatientUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PatientUuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PatientUuid::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_canonical_uuid() {
        let id = PatientUuid::new();
        let text = id.to_string();

        assert_eq!(text.len(), 36);
        assert!(PatientUuid::is_canonical(&text));
    }

    #[test]
    fn test_new_is_unique() {
        assert_ne!(PatientUuid::new(), PatientUuid::new());
    }

    #[test]
    fn test_parse_round_trips_display() {
        let canonical = "550e8400-e29b-41d4-a716-446655440000";
        let id = PatientUuid::parse(canonical).expect("canonical uuid should parse");
        assert_eq!(id.to_string(), canonical);
    }

    #[test]
    fn test_parse_rejects_simple_form() {
        let result = PatientUuid::parse("550e8400e29b41d4a716446655440000");
        match result {
            Err(UuidError::InvalidInput(msg)) => assert!(msg.contains("hyphenated")),
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_parse_rejects_uppercase() {
        assert!(PatientUuid::parse("550E8400-E29B-41D4-A716-446655440000").is_err());
    }

    #[test]
    fn test_parse_rejects_misplaced_hyphen() {
        assert!(PatientUuid::parse("550e840-0e29b-41d4-a716-446655440000").is_err());
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = PatientUuid::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");

        let bad: Result<PatientUuid, _> = serde_json::from_str("\"not-a-uuid\"");
        assert!(bad.is_err());
    }
}
