//! # Tax Calculation Orchestration
//!
//! Builds the calculation request for a document under a resolved
//! configuration, sends it to the [`TaxEngine`] with a bounded wait, and
//! maps the response back onto the document.
//!
//! ## Request construction
//!
//! Each line carries its own situation-code overrides. A line that leaves
//! a code unset inherits the resolved configuration's code for that tax
//! type. The fiscal benefit code is line-only.
//!
//! ## Response mapping
//!
//! Response items are matched to document lines by position. A count
//! mismatch is a failed calculation. Products, discounts, and taxes totals
//! come from the engine; the grand total is always recomposed from the
//! document header. Nothing is written to the document unless the whole
//! response is usable.

use std::time::Duration;

use chrono::{DateTime, Utc};
use fisco_client::{TaxCalculationRequest, TaxCalculationResponse, TaxRequestItem};
use fisco_core::{
    CompanyId, FiscalDocument, JurisdictionConfig, LineItem, LineTaxes, TaxType, Totals,
};

use crate::error::EngineError;
use crate::resolver::Resolution;
use crate::source::TaxEngine;

/// Default bound on a single tax-engine call.
pub const DEFAULT_CALCULATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Engine tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Upper bound on one tax-engine call; expiry is a failed calculation.
    pub calculation_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            calculation_timeout: DEFAULT_CALCULATION_TIMEOUT,
        }
    }
}

/// A successful calculation, ready to be applied to a document.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    /// Per-line taxes, in document line order.
    pub lines: Vec<LineTaxes>,
    /// Totals as composed against the calculated document.
    pub totals: Totals,
    /// When the engine answered.
    pub calculated_at: DateTime<Utc>,
}

impl CalculationResult {
    /// Write line taxes, totals, and the calculation timestamp onto `doc`.
    ///
    /// The grand total is recomposed against `doc`'s current header. Fails
    /// without touching `doc` when its line count no longer matches.
    pub fn apply_to(&self, doc: &mut FiscalDocument) -> Result<(), EngineError> {
        if self.lines.len() != doc.items.len() {
            return Err(EngineError::calculation(format!(
                "result has {} lines, document has {}",
                self.lines.len(),
                doc.items.len()
            )));
        }
        for (item, taxes) in doc.items.iter_mut().zip(&self.lines) {
            item.taxes = taxes.clone();
        }
        doc.totals = Totals::compose(
            self.totals.products_total,
            self.totals.discounts_total,
            self.totals.taxes_total,
            &doc.header,
        );
        doc.calculated_at = Some(self.calculated_at);
        Ok(())
    }
}

/// Build the tax-engine request for `doc` under `resolution`.
pub fn build_request(
    doc: &FiscalDocument,
    resolution: &Resolution,
    company_id: &CompanyId,
) -> TaxCalculationRequest {
    let header = &doc.header;
    TaxCalculationRequest {
        company_id: company_id.clone(),
        client_id: header.client_id.clone(),
        operation_nature_id: header.operation_nature_id.clone(),
        origin_jurisdiction: resolution.resolved_origin.clone(),
        destination_jurisdiction: resolution.resolved_destination.clone(),
        include_freight_in_total: header.include_freight_in_total,
        freight_amount: header.freight_amount,
        other_expenses: header.other_expenses,
        items: doc
            .items
            .iter()
            .map(|item| request_item(item, &resolution.config))
            .collect(),
    }
}

fn request_item(item: &LineItem, config: &JurisdictionConfig) -> TaxRequestItem {
    let situation = |line: &Option<String>, tax: TaxType| {
        line.as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| config.situation_code(tax))
            .map(str::to_owned)
    };
    let o = &item.overrides;
    TaxRequestItem {
        code: item.code.clone(),
        name: item.name.clone(),
        unit: item.unit.clone(),
        quantity: item.quantity,
        unit_price: item.unit_price,
        discount_amount: item.discount_amount,
        icms_situation: situation(&o.icms_situation, TaxType::Icms),
        ipi_situation: situation(&o.ipi_situation, TaxType::Ipi),
        pis_situation: situation(&o.pis_situation, TaxType::Pis),
        cofins_situation: situation(&o.cofins_situation, TaxType::Cofins),
        fiscal_benefit_code: o
            .fiscal_benefit_code
            .clone()
            .filter(|s| !s.trim().is_empty()),
    }
}

/// Map an engine response onto the shape of `doc`.
fn map_response(
    doc: &FiscalDocument,
    resp: TaxCalculationResponse,
) -> Result<CalculationResult, EngineError> {
    if resp.items.len() != doc.items.len() {
        return Err(EngineError::calculation(format!(
            "engine returned {} items for {} lines",
            resp.items.len(),
            doc.items.len()
        )));
    }
    let lines = resp
        .items
        .into_iter()
        .map(|item| LineTaxes {
            icms: item.icms,
            icms_st: item.icms_st,
            ipi: item.ipi,
            pis: item.pis,
            cofins: item.cofins,
        })
        .collect();
    Ok(CalculationResult {
        lines,
        totals: Totals::compose(
            resp.totals.total_products,
            resp.totals.total_discounts,
            resp.totals.total_taxes,
            &doc.header,
        ),
        calculated_at: Utc::now(),
    })
}

/// Runs one calculation cycle against a [`TaxEngine`].
#[derive(Debug, Clone)]
pub struct TaxOrchestrator<E> {
    engine: E,
    company_id: CompanyId,
    settings: EngineSettings,
}

impl<E: TaxEngine> TaxOrchestrator<E> {
    /// Orchestrator issuing requests on behalf of `company_id`.
    pub fn new(engine: E, company_id: CompanyId, settings: EngineSettings) -> Self {
        Self {
            engine,
            company_id,
            settings,
        }
    }

    /// The configured tunables.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Calculate taxes for `doc` under `resolution`.
    ///
    /// Sends exactly one request. The document is not modified; apply the
    /// result with [`CalculationResult::apply_to`].
    pub async fn calculate(
        &self,
        doc: &FiscalDocument,
        resolution: &Resolution,
    ) -> Result<CalculationResult, EngineError> {
        if !doc.has_items() {
            return Err(EngineError::EmptyDocument);
        }

        let request = build_request(doc, resolution, &self.company_id);
        let timeout = self.settings.calculation_timeout;

        let resp = match tokio::time::timeout(timeout, self.engine.calculate(&request)).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "tax calculation failed");
                return Err(EngineError::calculation(e));
            }
            Err(_) => {
                tracing::warn!(?timeout, "tax calculation timed out");
                return Err(EngineError::calculation(format!(
                    "no response within {}s",
                    timeout.as_secs_f64()
                )));
            }
        };

        map_response(doc, resp)
    }
}
