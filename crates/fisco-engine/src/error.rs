//! Engine error taxonomy.
//!
//! Every variant exposes a [`Severity`] so presentation layers can decide
//! between blocking the user and offering a retry without inspecting the
//! message text. A fallback configuration is not an error: it travels on
//! the successful [`Resolution`](crate::Resolution) as a
//! [`FallbackNotice`](crate::FallbackNotice).

use std::fmt;

use fisco_core::{ClientId, OperationNatureId};
use thiserror::Error;

/// How an error should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The user must change the document or its reference data first.
    Blocking,
    /// Transient; the same action may succeed if repeated.
    Retryable,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocking => f.write_str("blocking"),
            Self::Retryable => f.write_str("retryable"),
        }
    }
}

/// Errors raised by the fiscal computation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No jurisdiction configuration row exists for the operation nature.
    #[error("no jurisdiction configuration available for operation nature {operation_nature}")]
    NoConfigurationAvailable {
        /// The nature that was looked up.
        operation_nature: OperationNatureId,
    },

    /// The configuration lookup itself failed (network, non-2xx, body).
    #[error("jurisdiction configuration lookup failed for {operation_nature}: {reason}")]
    ConfigLookupFailed {
        /// The nature that was looked up.
        operation_nature: OperationNatureId,
        /// Underlying failure.
        reason: String,
    },

    /// The partner registry could not be consulted.
    #[error("partner lookup failed for {client}: {reason}")]
    PartnerLookupFailed {
        /// The client that was looked up.
        client: ClientId,
        /// Underlying failure.
        reason: String,
    },

    /// The document has no line items; nothing was sent.
    #[error("document has no line items")]
    EmptyDocument,

    /// The tax calculation did not produce a usable result.
    #[error("tax calculation failed: {reason}")]
    CalculationFailed {
        /// Underlying failure.
        reason: String,
    },
}

impl EngineError {
    /// Presentation severity of this error.
    pub fn severity(&self) -> Severity {
        match self {
            Self::NoConfigurationAvailable { .. } | Self::EmptyDocument => Severity::Blocking,
            Self::ConfigLookupFailed { .. }
            | Self::PartnerLookupFailed { .. }
            | Self::CalculationFailed { .. } => Severity::Retryable,
        }
    }

    /// Whether repeating the action may succeed.
    pub fn is_retryable(&self) -> bool {
        self.severity() == Severity::Retryable
    }

    pub(crate) fn calculation(reason: impl fmt::Display) -> Self {
        Self::CalculationFailed {
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nature() -> OperationNatureId {
        OperationNatureId::new("venda").unwrap()
    }

    #[test]
    fn severities_follow_taxonomy() {
        assert_eq!(
            EngineError::NoConfigurationAvailable { operation_nature: nature() }.severity(),
            Severity::Blocking
        );
        assert_eq!(EngineError::EmptyDocument.severity(), Severity::Blocking);
        assert_eq!(
            EngineError::ConfigLookupFailed {
                operation_nature: nature(),
                reason: "timeout".into(),
            }
            .severity(),
            Severity::Retryable
        );
        assert!(EngineError::calculation("boom").is_retryable());
    }

    #[test]
    fn messages_name_the_nature() {
        let err = EngineError::NoConfigurationAvailable { operation_nature: nature() };
        assert!(err.to_string().contains("venda"));
        let err = EngineError::calculation("status 502");
        assert_eq!(err.to_string(), "tax calculation failed: status 502");
    }
}
