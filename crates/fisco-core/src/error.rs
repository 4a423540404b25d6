//! # Validation Errors
//!
//! Construction-time errors for the domain primitive newtypes. Each
//! variant carries the rejected input so a misconfigured catalog row can
//! be diagnosed from the log line alone.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Jurisdiction code is not a two-letter state code.
    #[error("invalid jurisdiction code: \"{0}\" (expected a two-letter UF code such as SP or RJ)")]
    InvalidJurisdictionCode(String),

    /// CFOP is not a four-digit code.
    #[error("invalid CFOP: \"{0}\" (expected 4 digits)")]
    InvalidCfop(String),

    /// A string identifier was empty or whitespace-only.
    #[error("invalid {kind}: must be non-empty")]
    EmptyIdentifier {
        /// Which identifier type rejected the value.
        kind: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jurisdiction_error_names_input() {
        let err = ValidationError::InvalidJurisdictionCode("São Paulo".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("São Paulo"));
        assert!(msg.contains("two-letter"));
    }

    #[test]
    fn cfop_error_names_input() {
        let err = ValidationError::InvalidCfop("51".to_string());
        assert!(format!("{err}").contains("\"51\""));
    }

    #[test]
    fn empty_identifier_names_kind() {
        let err = ValidationError::EmptyIdentifier { kind: "client id" };
        assert_eq!(format!("{err}"), "invalid client id: must be non-empty");
    }
}
