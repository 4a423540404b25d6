//! # Identity Newtypes
//!
//! String identifiers issued by external catalogs (company registry,
//! partner book, operation-nature catalog, product catalog). The engine
//! never mints these; it only carries them between the document and the
//! tax engine, so validation is limited to non-emptiness.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create the identifier, rejecting empty or whitespace-only input.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::EmptyIdentifier`] for blank input.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::EmptyIdentifier { kind: $kind });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Access the identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_identifier!(
    /// Identifier of an operation nature (sale, purchase, return, ...).
    OperationNatureId,
    "operation nature id"
);

string_identifier!(
    /// Identifier of the issuing company.
    CompanyId,
    "company id"
);

string_identifier!(
    /// Identifier of the client (partner) a document is addressed to.
    ClientId,
    "client id"
);

string_identifier!(
    /// Identifier of a product in a price list.
    ProductId,
    "product id"
);
