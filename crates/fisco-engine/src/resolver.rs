//! # Jurisdiction Configuration Resolution
//!
//! Picks the [`JurisdictionConfig`] row that applies to a document with a
//! three-step ordering:
//!
//! 1. The enabled row for the destination jurisdiction (no fallback).
//! 2. The enabled row for the origin jurisdiction.
//! 3. The first row returned by the source, enabled or not.
//!
//! Steps 2 and 3 mark the resolution as a fallback and carry a
//! [`FallbackNotice`] naming the substituted jurisdiction. An empty row set
//! is [`EngineError::NoConfigurationAvailable`]; a failed lookup is
//! [`EngineError::ConfigLookupFailed`]. There is no zero-tax default.

use std::collections::BTreeSet;
use std::fmt;

use fisco_core::{JurisdictionCode, JurisdictionConfig, OperationNatureId};

use crate::error::EngineError;
use crate::source::JurisdictionConfigSource;

/// Why a non-destination row was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The destination had no enabled row; the origin's was used.
    OriginSubstituted,
    /// Neither destination nor origin had an enabled row; the first row
    /// of the set was used.
    FirstAvailable,
}

/// Informational notice carried on a successful fallback resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackNotice {
    /// Jurisdiction the document asked for.
    pub requested: JurisdictionCode,
    /// Jurisdiction whose configuration was applied instead.
    pub substituted: JurisdictionCode,
    /// Which fallback step matched.
    pub reason: FallbackReason,
}

impl fmt::Display for FallbackNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            FallbackReason::OriginSubstituted => write!(
                f,
                "no enabled configuration for {}; using origin jurisdiction {}",
                self.requested, self.substituted
            ),
            FallbackReason::FirstAvailable => write!(
                f,
                "no enabled configuration for {}; using first available ({})",
                self.requested, self.substituted
            ),
        }
    }
}

/// Outcome of [`ConfigResolver::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The applied configuration row.
    pub config: JurisdictionConfig,
    /// Set when the row is not the destination's enabled row.
    pub fallback: Option<FallbackNotice>,
    /// Origin jurisdiction to calculate with.
    pub resolved_origin: JurisdictionCode,
    /// Destination jurisdiction to calculate with. Always the requested
    /// destination; a fallback changes the applied rates, not the route.
    pub resolved_destination: JurisdictionCode,
}

impl Resolution {
    /// Whether a fallback row was applied.
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Select a row from a fetched set. `None` only when `rows` is empty.
pub fn select_config<'a>(
    rows: &'a [JurisdictionConfig],
    origin: &JurisdictionCode,
    destination: &JurisdictionCode,
) -> Option<(&'a JurisdictionConfig, Option<FallbackReason>)> {
    let enabled_for =
        |code: &JurisdictionCode| rows.iter().find(|r| r.enabled && &r.jurisdiction_code == code);

    if let Some(row) = enabled_for(destination) {
        return Some((row, None));
    }
    if let Some(row) = enabled_for(origin) {
        return Some((row, Some(FallbackReason::OriginSubstituted)));
    }
    rows.first().map(|row| (row, Some(FallbackReason::FirstAvailable)))
}

/// Jurisdictions that appear on more than one row, in first-seen order.
///
/// A well-formed set has one row per (nature, jurisdiction); with
/// duplicates, [`select_config`] takes the first.
pub fn duplicated_jurisdictions(rows: &[JurisdictionConfig]) -> Vec<&JurisdictionCode> {
    let mut seen = BTreeSet::new();
    let mut duplicated = Vec::new();
    for row in rows {
        let code = &row.jurisdiction_code;
        if !seen.insert(code) && !duplicated.contains(&code) {
            duplicated.push(code);
        }
    }
    duplicated
}

/// Resolves the applicable jurisdiction configuration for a document.
#[derive(Debug, Clone)]
pub struct ConfigResolver<S> {
    source: S,
}

impl<S: JurisdictionConfigSource> ConfigResolver<S> {
    /// Wrap a configuration source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Resolve the configuration for `operation_nature` shipping from
    /// `origin` to `destination`. Pure read.
    pub async fn resolve(
        &self,
        operation_nature: &OperationNatureId,
        origin: &JurisdictionCode,
        destination: &JurisdictionCode,
    ) -> Result<Resolution, EngineError> {
        let rows = self
            .source
            .configs_for(operation_nature)
            .await
            .map_err(|e| {
                tracing::warn!(%operation_nature, error = %e, "jurisdiction config lookup failed");
                EngineError::ConfigLookupFailed {
                    operation_nature: operation_nature.clone(),
                    reason: e.to_string(),
                }
            })?;

        for code in duplicated_jurisdictions(&rows) {
            tracing::warn!(
                %operation_nature,
                jurisdiction = %code,
                "more than one configuration row for jurisdiction; first one wins"
            );
        }

        let (row, reason) = select_config(&rows, origin, destination).ok_or_else(|| {
            EngineError::NoConfigurationAvailable {
                operation_nature: operation_nature.clone(),
            }
        })?;

        let fallback = reason.map(|reason| FallbackNotice {
            requested: destination.clone(),
            substituted: row.jurisdiction_code.clone(),
            reason,
        });

        match &fallback {
            Some(notice) if !row.enabled => {
                tracing::warn!(%operation_nature, enabled = false, "{notice}");
            }
            Some(notice) => tracing::info!(%operation_nature, "{notice}"),
            None => tracing::debug!(%operation_nature, %destination, "destination configuration applied"),
        }

        Ok(Resolution {
            resolved_origin: origin.clone(),
            resolved_destination: destination.clone(),
            config: row.clone(),
            fallback,
        })
    }
}
