//! # Resolve Subcommand
//!
//! Shows which jurisdiction configuration applies to an operation nature
//! on a given route. With `--configs` the rows come from a local JSON
//! file (rows for other natures are ignored); otherwise the configuration
//! service is queried.

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use fisco_client::FiscoApiError;
use fisco_core::{JurisdictionCode, JurisdictionConfig, OperationNatureId};
use fisco_engine::{ConfigResolver, EngineError, JurisdictionConfigSource, Resolution};
use serde::Serialize;

use crate::{read_json, to_pretty_json};

/// Arguments for the `fisco resolve` subcommand.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Operation nature identifier.
    #[arg(long)]
    pub nature: String,

    /// Origin jurisdiction (state code).
    #[arg(long)]
    pub origin: JurisdictionCode,

    /// Destination jurisdiction (state code).
    #[arg(long)]
    pub destination: JurisdictionCode,

    /// JSON file of configuration rows to resolve against offline.
    #[arg(long)]
    pub configs: Option<PathBuf>,
}

/// Rows loaded from a file.
#[derive(Debug, Clone)]
pub struct FileConfigs(pub Vec<JurisdictionConfig>);

#[async_trait]
impl JurisdictionConfigSource for FileConfigs {
    async fn configs_for(
        &self,
        operation_nature: &OperationNatureId,
    ) -> Result<Vec<JurisdictionConfig>, FiscoApiError> {
        Ok(self
            .0
            .iter()
            .filter(|row| &row.operation_nature_id == operation_nature)
            .cloned()
            .collect())
    }
}

/// Printable form of a [`Resolution`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionReport {
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_notice: Option<String>,
    pub resolved_origin: JurisdictionCode,
    pub resolved_destination: JurisdictionCode,
    pub config: JurisdictionConfig,
}

impl From<Resolution> for ResolutionReport {
    fn from(res: Resolution) -> Self {
        Self {
            used_fallback: res.used_fallback(),
            fallback_notice: res.fallback.as_ref().map(ToString::to_string),
            resolved_origin: res.resolved_origin,
            resolved_destination: res.resolved_destination,
            config: res.config,
        }
    }
}

/// Resolve against any source.
pub async fn resolve_with<S: JurisdictionConfigSource>(
    source: S,
    args: &ResolveArgs,
) -> Result<std::result::Result<ResolutionReport, EngineError>> {
    let nature = OperationNatureId::new(args.nature.as_str())?;
    let resolver = ConfigResolver::new(source);
    Ok(resolver
        .resolve(&nature, &args.origin, &args.destination)
        .await
        .map(ResolutionReport::from))
}

/// Execute the resolve subcommand.
pub fn run_resolve(args: &ResolveArgs) -> Result<u8> {
    let rt = crate::runtime()?;
    let outcome = match &args.configs {
        Some(path) => {
            let rows: Vec<JurisdictionConfig> = read_json(path)?;
            rt.block_on(resolve_with(FileConfigs(rows), args))?
        }
        None => {
            let (client, _) = crate::connect()?;
            rt.block_on(resolve_with(client, args))?
        }
    };

    match outcome {
        Ok(report) => {
            println!("{}", to_pretty_json(&report)?);
            Ok(0)
        }
        Err(e) => Ok(crate::report_engine_error(&e)),
    }
}
