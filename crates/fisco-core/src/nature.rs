//! # Operation Natures and CFOP
//!
//! An [`OperationNature`] classifies a commercial transaction and carries
//! the default [`Cfop`] used when the jurisdiction configuration does not
//! override it. Natures are reference data owned by an external catalog.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::OperationNatureId;

/// A four-digit fiscal operation code (e.g. `5102` for an in-state sale of
/// goods purchased from third parties).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cfop(String);

impl Cfop {
    /// Create a CFOP. Accepts the dotted form `5.102`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCfop`] unless the input contains
    /// exactly four digits once dots are removed.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let digits: String = raw.trim().chars().filter(|c| *c != '.').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidCfop(raw));
        }
        Ok(Self(digits))
    }

    /// Access the four-digit code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the code denotes an interstate movement (leading digit 2 or 6).
    pub fn is_interstate(&self) -> bool {
        matches!(self.0.as_bytes().first(), Some(b'2') | Some(b'6'))
    }
}

impl TryFrom<String> for Cfop {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Cfop> for String {
    fn from(cfop: Cfop) -> String {
        cfop.0
    }
}

impl std::fmt::Display for Cfop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of a commercial transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationNature {
    /// Catalog identifier.
    pub id: OperationNatureId,
    /// Display name ("Venda de mercadoria", "Devolução de compra", ...).
    pub name: String,
    /// CFOP used when no jurisdiction override applies.
    pub default_cfop: Cfop,
    /// Whether documents with this nature move inventory.
    #[serde(default)]
    pub moves_inventory: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cfop_accepts_plain_and_dotted() {
        assert_eq!(Cfop::new("5102").unwrap().as_str(), "5102");
        assert_eq!(Cfop::new("6.108").unwrap().as_str(), "6108");
    }

    #[test]
    fn cfop_rejects_malformed() {
        for bad in ["510", "51020", "5A02", "", "5..10"] {
            assert!(Cfop::new(bad).is_err(), "{bad:?} must be rejected");
        }
    }

    #[test]
    fn cfop_interstate_flag() {
        assert!(!Cfop::new("5102").unwrap().is_interstate());
        assert!(Cfop::new("6102").unwrap().is_interstate());
        assert!(Cfop::new("2102").unwrap().is_interstate());
    }

    #[test]
    fn nature_deserializes_from_catalog_json() {
        let nature: OperationNature = serde_json::from_value(serde_json::json!({
            "id": "venda",
            "name": "Venda de mercadoria",
            "defaultCfop": "5.102",
            "movesInventory": true
        }))
        .unwrap();
        assert_eq!(nature.default_cfop.as_str(), "5102");
        assert!(nature.moves_inventory);
    }
}
