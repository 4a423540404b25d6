//! # fisco-cli: Command-Line Interface for the Fisco Engine
//!
//! Provides the `fisco` binary.
//!
//! ## Subcommands
//!
//! - `fisco schedule`: Installment preview for a total and payment term.
//! - `fisco price`: Apply or reset a price adjustment over a product set.
//! - `fisco resolve`: Resolve the jurisdiction configuration for a route.
//! - `fisco calculate`: Calculate taxes for a document.
//!
//! `schedule` and `price` are offline. `resolve` works offline against a
//! JSON file of configuration rows or online against the configuration
//! service. `calculate` always talks to the upstream services, configured
//! through `FISCO_*` environment variables.
//!
//! ```bash
//! fisco schedule --total 100.00 --emission 2024-01-15 --installments 3 --interval-days 30
//! fisco price --items products.json --percent 12.5
//! fisco resolve --nature venda --origin SP --destination RJ --configs rows.json
//! fisco calculate --document order.json --output order.calculated.json
//! ```

pub mod calculate;
pub mod price;
pub mod resolve;
pub mod schedule;

use std::path::Path;

use anyhow::{Context, Result};
use fisco_client::{FiscoApiConfig, FiscoClient};
use fisco_engine::{EngineError, EngineSettings, Severity};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Render a value as pretty JSON.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}

/// Runtime for the subcommands that call upstream services.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

/// Client and engine settings from the `FISCO_*` environment variables.
pub(crate) fn connect() -> Result<(FiscoClient, EngineSettings)> {
    let config = FiscoApiConfig::from_env().context("invalid FISCO_* environment")?;
    let settings = EngineSettings {
        calculation_timeout: std::time::Duration::from_secs(config.timeout_secs),
    };
    tracing::debug!(?config, "connecting to upstream services");
    let client = FiscoClient::new(config).context("failed to build HTTP client")?;
    Ok((client, settings))
}

/// Process exit code for an engine error: 2 when the user must act, 1 when
/// a retry may succeed.
pub fn exit_code(err: &EngineError) -> u8 {
    match err.severity() {
        Severity::Blocking => 2,
        Severity::Retryable => 1,
    }
}

/// Log an engine error and map it to an exit code.
pub(crate) fn report_engine_error(err: &EngineError) -> u8 {
    tracing::error!(severity = %err.severity(), "{err}");
    exit_code(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fisco_core::OperationNatureId;

    #[test]
    fn exit_codes_follow_severity() {
        assert_eq!(exit_code(&EngineError::EmptyDocument), 2);
        assert_eq!(
            exit_code(&EngineError::NoConfigurationAvailable {
                operation_nature: OperationNatureId::new("venda").unwrap(),
            }),
            2
        );
        assert_eq!(
            exit_code(&EngineError::CalculationFailed {
                reason: "timeout".into()
            }),
            1
        );
    }

    #[test]
    fn read_json_reports_path_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = read_json::<serde_json::Value>(&path).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}
