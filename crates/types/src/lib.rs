//! Small validated value types shared across the EMIS crates.
//!
//! Everything here is constructed through a checking constructor or `FromStr`, so holders of
//! these types can rely on the invariant without re-validating.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input did not match any member of a closed set of codes
    #[error("'{value}' is not a recognised {kind}")]
    UnknownCode { kind: &'static str, value: String },
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Generates a closed code enum with its textual forms.
///
/// Each generated type implements `Display`, `FromStr` and serde in terms of the listed codes,
/// and exposes `ALL` for building pick-lists.
macro_rules! code_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every member, in form display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The code as stored and displayed.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TextError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| TextError::UnknownCode {
                        kind: $kind,
                        value: s.to_owned(),
                    })
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

code_enum!(
    /// Haemoglobin genotype.
    Genotype, "genotype", {
        Aa => "AA",
        Ac => "AC",
        As => "AS",
        Cc => "CC",
        Ss => "SS",
        Sc => "SC",
    }
);

code_enum!(
    /// ABO/Rh blood type.
    BloodType, "blood type", {
        APositive => "A+",
        ANegative => "A-",
        BPositive => "B+",
        BNegative => "B-",
        AbPositive => "AB+",
        AbNegative => "AB-",
        OPositive => "O+",
        ONegative => "O-",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        assert_eq!(NonEmptyText::new("  Ada Obi ").unwrap().as_str(), "Ada Obi");
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
    }

    #[test]
    fn genotype_parses_all_codes_case_insensitively() {
        for g in Genotype::ALL {
            assert_eq!(g.as_str().parse::<Genotype>().unwrap(), *g);
        }
        assert_eq!("sc".parse::<Genotype>().unwrap(), Genotype::Sc);
        assert_eq!(Genotype::ALL.len(), 6);
    }

    #[test]
    fn blood_type_rejects_unknown_code() {
        let err = "C+".parse::<BloodType>().unwrap_err();
        assert_eq!(
            err,
            TextError::UnknownCode {
                kind: "blood type",
                value: "C+".into()
            }
        );
        assert_eq!(BloodType::ALL.len(), 8);
    }

    #[test]
    fn codes_serialize_as_plain_strings() {
        let json = serde_json::to_string(&BloodType::AbNegative).unwrap();
        assert_eq!(json, "\"AB-\"");
        let back: BloodType = serde_json::from_str("\"o+\"").unwrap();
        assert_eq!(back, BloodType::OPositive);
    }
}
