//! # Calculate Subcommand
//!
//! Reads a fiscal document from JSON, resolves its configuration,
//! calculates its taxes, and writes the updated document. On failure the
//! input document is left as it was and nothing is written.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fisco_core::FiscalDocument;
use fisco_engine::{
    CalculationSession, Completion, EngineError, FiscalEngine, JurisdictionConfigSource,
    PartnerDirectory, TaxEngine,
};

use crate::{read_json, to_pretty_json};

/// Arguments for the `fisco calculate` subcommand.
#[derive(Args, Debug)]
pub struct CalculateArgs {
    /// JSON file holding the document.
    #[arg(long)]
    pub document: PathBuf,

    /// Write the calculated document here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Replace the destination with the client's address state first.
    #[arg(long)]
    pub destination_from_partner: bool,
}

/// Calculate `doc` once and return it with taxes and totals applied.
pub async fn calculate_document<S, E, P>(
    engine: &FiscalEngine<S, E, P>,
    mut doc: FiscalDocument,
    destination_from_partner: bool,
) -> Result<FiscalDocument, EngineError>
where
    S: JurisdictionConfigSource,
    E: TaxEngine,
    P: PartnerDirectory,
{
    if destination_from_partner {
        match engine.destination_for(&doc.header.client_id).await? {
            Some(code) => {
                tracing::info!(destination = %code, "destination taken from partner address");
                doc.header.destination_jurisdiction = code;
            }
            None => tracing::warn!(
                client = %doc.header.client_id,
                "partner has no address; keeping document destination"
            ),
        }
    }

    let session = CalculationSession::new();
    let outcome = engine.recompute(&session, &doc).await;
    if let Some(notice) = &outcome.fallback {
        tracing::warn!("{notice}");
    }
    match outcome.completion {
        Completion::Applied => {
            session.apply_latest(&mut doc)?;
            Ok(doc)
        }
        Completion::Failed(e) => Err(e),
        Completion::Stale => Err(EngineError::CalculationFailed {
            reason: "calculation superseded".into(),
        }),
    }
}

/// Execute the calculate subcommand.
pub fn run_calculate(args: &CalculateArgs) -> Result<u8> {
    let doc: FiscalDocument = read_json(&args.document)?;
    let (client, settings) = crate::connect()?;
    let engine = FiscalEngine::from_client(client, settings);

    let rt = crate::runtime()?;
    let doc = match rt.block_on(calculate_document(&engine, doc, args.destination_from_partner)) {
        Ok(doc) => doc,
        Err(e) => return Ok(crate::report_engine_error(&e)),
    };

    let rendered = to_pretty_json(&doc)?;
    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(0)
}
