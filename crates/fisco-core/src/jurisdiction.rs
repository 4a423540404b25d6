//! # Jurisdiction Codes
//!
//! A [`JurisdictionCode`] names the state (UF) whose tax configuration
//! applies to a movement of goods. Codes are two ASCII letters, normalized
//! to upper case at construction ("sp" and " SP " both become `SP`). The
//! pseudo-state `EX` (exterior) is accepted like any other code.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A two-letter state (UF) code such as `SP`, `RJ`, or `EX`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JurisdictionCode(String);

impl JurisdictionCode {
    /// Create a jurisdiction code, normalizing case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidJurisdictionCode`] unless the trimmed
    /// input is exactly two ASCII letters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidJurisdictionCode(raw));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Access the normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JurisdictionCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JurisdictionCode> for String {
    fn from(code: JurisdictionCode) -> String {
        code.0
    }
}

impl std::str::FromStr for JurisdictionCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for JurisdictionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
