//! Identity value types.
//!
//! These wrap the normalized forms produced by [`crate::validation`]. Values read back from the
//! record store are re-checked on the way in, so a `Patient` never carries an unnormalized
//! identifier.

use crate::constants::{COUNTRY_CODE, MAX_AGE, NIN_LENGTH, PUBLIC_ID_PREFIX};
use crate::validation::{normalize_phone, validate_identity_number};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// An 11-digit national identification number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    pub fn parse(value: &str) -> Option<Self> {
        validate_identity_number(value).then(|| Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn last_four(&self) -> &str {
        &self.0[NIN_LENGTH - 4..]
    }
}

/// A phone number in international form, `+234` followed by ten digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Wraps digits already in `234XXXXXXXXXX` form.
    pub(crate) fn from_international_digits(digits: &str) -> Self {
        debug_assert!(digits.starts_with(COUNTRY_CODE) && digits.len() == 13);
        Self(format!("+{}", digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn last_four(&self) -> &str {
        &self.0[self.0.len() - 4..]
    }
}

/// Age in whole years, `0..=120`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Age(u8);

impl Age {
    pub fn new(years: u16) -> Option<Self> {
        u8::try_from(years)
            .ok()
            .filter(|y| *y <= MAX_AGE)
            .map(Self)
    }

    pub fn years(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short public identifier printed into patient links.
///
/// Format: `PAT` + last four digits of the national ID + age + last four digits of the
/// normalized phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicId(String);

impl PublicId {
    pub fn derive(nin: &NationalId, age: Age, phone: &PhoneNumber) -> Self {
        Self(format!(
            "{}{}{}{}",
            PUBLIC_ID_PREFIX,
            nin.last_four(),
            age,
            phone.last_four()
        ))
    }

    /// Accepts `PAT` followed by at least nine digits (4 + age + 4).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let digits = value.strip_prefix(PUBLIC_ID_PREFIX)?;
        let ok = digits.len() >= 9 && digits.bytes().all(|b| b.is_ascii_digit());
        ok.then(|| Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A cleaned comma-joined list of free-text entries (allergies, medical history).
///
/// Entries are trimmed, blanks dropped, duplicates removed ignoring case (the first spelling
/// wins) and the remainder sorted ignoring case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct EntryList(String);

impl EntryList {
    pub fn clean(text: &str) -> Self {
        let mut seen = HashSet::new();
        let mut entries: Vec<&str> = text
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .filter(|e| seen.insert(e.to_lowercase()))
            .collect();
        entries.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        Self(entries.join(","))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.0.split(',').filter(|e| !e.is_empty())
    }
}

// ============================================================================
// String conversions
// ============================================================================

macro_rules! text_newtype {
    ($name:ident, $what:literal, $parse:expr) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                let parse: fn(&str) -> Option<$name> = $parse;
                parse(&value).ok_or_else(|| format!("'{}' is not a valid {}", value, $what))
            }
        }
    };
}

text_newtype!(NationalId, "national ID", NationalId::parse);
text_newtype!(PublicId, "public identifier", PublicId::parse);
text_newtype!(PhoneNumber, "phone number", |v| {
    // Stored values are already international; re-normalizing them is the identity.
    normalize_phone(v).filter(|p| p.as_str() == v)
});

impl fmt::Display for EntryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntryList {
    fn from(value: String) -> Self {
        Self::clean(&value)
    }
}

impl From<EntryList> for String {
    fn from(value: EntryList) -> String {
        value.0
    }
}

impl TryFrom<u16> for Age {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Age::new(value).ok_or_else(|| format!("age {} is outside 0..={}", value, MAX_AGE))
    }
}

impl From<Age> for u16 {
    fn from(value: Age) -> u16 {
        value.0.into()
    }
}
