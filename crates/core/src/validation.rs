//! Input validation.
//!
//! Raw form input arrives as a [`PatientSubmission`]. [`PatientSubmission::validate`] checks every
//! field before anything is written and produces a [`ValidatedSubmission`], which is the only
//! input the upsert flow accepts.

use crate::constants::{COUNTRY_CODE, NIN_LENGTH, TRUNK_PREFIX};
use crate::identity::{Age, EntryList, NationalId, PhoneNumber, PublicId};
use emis_types::{BloodType, Genotype, NonEmptyText};
use serde::{Deserialize, Serialize};

/// Returns true iff `value` is exactly 11 ASCII decimal digits.
pub fn validate_identity_number(value: &str) -> bool {
    value.len() == NIN_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
}

/// Normalizes a phone number to `+234XXXXXXXXXX`.
///
/// All non-digit characters are stripped first. Accepted shapes are ten digits, eleven digits
/// with a leading trunk `0`, and thirteen digits starting with `234`. Anything else yields `None`.
pub fn normalize_phone(value: &str) -> Option<PhoneNumber> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();

    let international = match digits.len() {
        10 => format!("{}{}", COUNTRY_CODE, digits),
        11 => format!("{}{}", COUNTRY_CODE, digits.strip_prefix(TRUNK_PREFIX)?),
        13 if digits.starts_with(COUNTRY_CODE) => digits,
        _ => return None,
    };

    Some(PhoneNumber::from_international_digits(&international))
}

/// Returns true iff the two normalized numbers differ.
pub fn distinct_phone_pair(a: &PhoneNumber, b: &PhoneNumber) -> bool {
    a != b
}

/// A rejected submission field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("consent to store and share the record is required")]
    ConsentRequired,
    #[error("name cannot be empty")]
    EmptyName,
    #[error("age must be a whole number between 0 and 120, got '{0}'")]
    InvalidAge(String),
    #[error("national ID must be exactly 11 digits")]
    InvalidNationalId,
    #[error("'{0}' is not a valid phone number")]
    InvalidPhone(String),
    #[error("'{0}' is not a valid emergency contact number")]
    InvalidEmergencyContact(String),
    #[error("phone number and emergency contact must be different")]
    SamePhoneAndEmergencyContact,
    #[error("'{0}' is not a recognised genotype")]
    UnknownGenotype(String),
    #[error("'{0}' is not a recognised blood type")]
    UnknownBloodType(String),
}

impl ValidationError {
    /// The submission field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::ConsentRequired => "consent",
            Self::EmptyName => "name",
            Self::InvalidAge(_) => "age",
            Self::InvalidNationalId => "nin",
            Self::InvalidPhone(_) => "phone",
            Self::InvalidEmergencyContact(_) | Self::SamePhoneAndEmergencyContact => {
                "emergency_contact"
            }
            Self::UnknownGenotype(_) => "genotype",
            Self::UnknownBloodType(_) => "blood_type",
        }
    }
}

/// Raw registration form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientSubmission {
    pub name: String,
    pub age: String,
    pub nin: String,
    pub phone: String,
    pub emergency_contact: String,
    pub genotype: String,
    pub blood_type: String,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub medical_history: String,
    #[serde(default)]
    pub consent: bool,
}

/// A submission whose every field has been checked and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    name: NonEmptyText,
    age: Age,
    nin: NationalId,
    phone: PhoneNumber,
    emergency_contact: PhoneNumber,
    genotype: Genotype,
    blood_type: BloodType,
    allergies: EntryList,
    medical_history: EntryList,
}

impl PatientSubmission {
    /// Validates every field, in form order, returning the first failure.
    pub fn validate(&self) -> Result<ValidatedSubmission, ValidationError> {
        if !self.consent {
            return Err(ValidationError::ConsentRequired);
        }

        let name = NonEmptyText::new(&self.name).map_err(|_| ValidationError::EmptyName)?;

        let age_raw = self.age.trim();
        let age = age_raw
            .parse::<u16>()
            .ok()
            .and_then(Age::new)
            .ok_or_else(|| ValidationError::InvalidAge(age_raw.to_owned()))?;

        let nin = NationalId::parse(self.nin.trim()).ok_or(ValidationError::InvalidNationalId)?;

        let phone = normalize_phone(&self.phone)
            .ok_or_else(|| ValidationError::InvalidPhone(self.phone.trim().to_owned()))?;
        let emergency_contact = normalize_phone(&self.emergency_contact).ok_or_else(|| {
            ValidationError::InvalidEmergencyContact(self.emergency_contact.trim().to_owned())
        })?;
        if !distinct_phone_pair(&phone, &emergency_contact) {
            return Err(ValidationError::SamePhoneAndEmergencyContact);
        }

        let genotype = self
            .genotype
            .parse::<Genotype>()
            .map_err(|_| ValidationError::UnknownGenotype(self.genotype.trim().to_owned()))?;
        let blood_type = self
            .blood_type
            .parse::<BloodType>()
            .map_err(|_| ValidationError::UnknownBloodType(self.blood_type.trim().to_owned()))?;

        Ok(ValidatedSubmission {
            name,
            age,
            nin,
            phone,
            emergency_contact,
            genotype,
            blood_type,
            allergies: EntryList::clean(&self.allergies),
            medical_history: EntryList::clean(&self.medical_history),
        })
    }
}

impl ValidatedSubmission {
    pub fn name(&self) -> &NonEmptyText {
        &self.name
    }

    pub fn age(&self) -> Age {
        self.age
    }

    pub fn nin(&self) -> &NationalId {
        &self.nin
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn emergency_contact(&self) -> &PhoneNumber {
        &self.emergency_contact
    }

    pub fn genotype(&self) -> Genotype {
        self.genotype
    }

    pub fn blood_type(&self) -> BloodType {
        self.blood_type
    }

    pub fn allergies(&self) -> &EntryList {
        &self.allergies
    }

    pub fn medical_history(&self) -> &EntryList {
        &self.medical_history
    }

    /// The public identifier a new patient created from this submission receives.
    pub fn public_id(&self) -> PublicId {
        PublicId::derive(&self.nin, self.age, &self.phone)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn ada_obi() -> PatientSubmission {
        PatientSubmission {
            name: "Ada Obi".into(),
            age: "29".into(),
            nin: "12345678901".into(),
            phone: "08012345678".into(),
            emergency_contact: "08098765432".into(),
            genotype: "AA".into(),
            blood_type: "O+".into(),
            allergies: "Penicillin, penicillin".into(),
            medical_history: String::new(),
            consent: true,
        }
    }

    #[test]
    fn test_validate_identity_number() {
        assert!(validate_identity_number("12345678901"));
        assert!(!validate_identity_number("1234"));
        assert!(!validate_identity_number("1234567890a"));
        assert!(!validate_identity_number("123456789012"));
        assert!(!validate_identity_number(""));
        // Non-ASCII digits are rejected even when the character count is 11.
        assert!(!validate_identity_number("١٢٣٤٥٦٧٨٩٠١"));
    }

    #[test]
    fn test_normalize_phone_accepted_shapes() {
        let expected = "+2348012345678";
        assert_eq!(normalize_phone("8012345678").unwrap().as_str(), expected);
        assert_eq!(normalize_phone("08012345678").unwrap().as_str(), expected);
        assert_eq!(normalize_phone("2348012345678").unwrap().as_str(), expected);
        assert_eq!(normalize_phone("+234 801 234 5678").unwrap().as_str(), expected);
        assert_eq!(normalize_phone("0801-234-5678").unwrap().as_str(), expected);
    }

    #[test]
    fn test_normalize_phone_rejects_other_shapes() {
        assert!(normalize_phone("").is_none());
        assert!(normalize_phone("12345").is_none());
        assert!(normalize_phone("18012345678").is_none());
        assert!(normalize_phone("4418012345678").is_none());
        assert!(normalize_phone("080123456789").is_none());
        assert!(normalize_phone("not a number").is_none());
    }

    #[test]
    fn test_distinct_phone_pair() {
        let a = normalize_phone("08012345678").unwrap();
        let same = normalize_phone("+2348012345678").unwrap();
        let b = normalize_phone("08098765432").unwrap();
        assert!(distinct_phone_pair(&a, &b));
        assert!(!distinct_phone_pair(&a, &same));
    }

    #[test]
    fn test_validate_ada_obi() {
        let valid = ada_obi().validate().expect("submission should validate");
        assert_eq!(valid.name().as_str(), "Ada Obi");
        assert_eq!(valid.age().years(), 29);
        assert_eq!(valid.phone().as_str(), "+2348012345678");
        assert_eq!(valid.emergency_contact().as_str(), "+2348098765432");
        assert_eq!(valid.genotype(), Genotype::Aa);
        assert_eq!(valid.blood_type(), BloodType::OPositive);
        assert_eq!(valid.allergies().as_str(), "Penicillin");
        assert!(valid.medical_history().is_empty());
        assert_eq!(valid.public_id().as_str(), "PAT8901295678");
    }

    #[test]
    fn test_validate_rejects_each_field() {
        let cases: Vec<(fn(&mut PatientSubmission), &str)> = vec![
            (|s| s.consent = false, "consent"),
            (|s| s.name = "  ".into(), "name"),
            (|s| s.age = "121".into(), "age"),
            (|s| s.age = "-1".into(), "age"),
            (|s| s.age = "twenty".into(), "age"),
            (|s| s.nin = "1234".into(), "nin"),
            (|s| s.phone = "12345".into(), "phone"),
            (|s| s.emergency_contact = "12".into(), "emergency_contact"),
            (|s| s.emergency_contact = "+2348012345678".into(), "emergency_contact"),
            (|s| s.genotype = "AB".into(), "genotype"),
            (|s| s.blood_type = "C+".into(), "blood_type"),
        ];

        for (mutate, field) in cases {
            let mut submission = ada_obi();
            mutate(&mut submission);
            let err = submission.validate().unwrap_err();
            assert_eq!(err.field(), field, "unexpected error {:?}", err);
        }
    }

    #[test]
    fn test_same_phone_reported_as_pair_error() {
        let mut submission = ada_obi();
        submission.emergency_contact = "8012345678".into();
        assert_eq!(
            submission.validate().unwrap_err(),
            ValidationError::SamePhoneAndEmergencyContact
        );
    }

    #[test]
    fn test_validate_trims_nin_and_accepts_lowercase_codes() {
        let mut submission = ada_obi();
        submission.nin = " 12345678901 ".into();
        submission.genotype = "as".into();
        submission.blood_type = "ab-".into();
        let valid = submission.validate().unwrap();
        assert_eq!(valid.nin().as_str(), "12345678901");
        assert_eq!(valid.genotype(), Genotype::As);
        assert_eq!(valid.blood_type(), BloodType::AbNegative);
    }
}
