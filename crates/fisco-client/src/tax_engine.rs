//! Typed client for the tax engine.
//!
//! Context path: `/tax-engine`
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/api/v1/calculations` | Calculate taxes for a document |
//!
//! The engine answers with one item per request item, in request order,
//! and document-level totals. Components a line is not subject to are
//! omitted from the response rather than zeroed.

use fisco_core::{ClientId, CompanyId, JurisdictionCode, OperationNatureId, TaxAmount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FiscoApiError;

const API_PREFIX: [&str; 3] = ["tax-engine", "api", "v1"];

// -- Request ------------------------------------------------------------------

/// Calculation request for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculationRequest {
    /// Company issuing the document.
    pub company_id: CompanyId,
    /// Buyer.
    pub client_id: ClientId,
    /// Operation nature the document was raised under.
    pub operation_nature_id: OperationNatureId,
    /// State the goods leave from.
    pub origin_jurisdiction: JurisdictionCode,
    /// State the goods are delivered to.
    pub destination_jurisdiction: JurisdictionCode,
    /// Whether freight is part of the taxable total.
    pub include_freight_in_total: bool,
    /// Document-level freight.
    pub freight_amount: Decimal,
    /// Document-level ancillary expenses.
    pub other_expenses: Decimal,
    /// Lines, in document order.
    pub items: Vec<TaxRequestItem>,
}

/// One line of a calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRequestItem {
    /// Product code.
    pub code: String,
    /// Product description.
    pub name: String,
    /// Unit of measure.
    pub unit: String,
    /// Quantity sold.
    pub quantity: Decimal,
    /// Price per unit before discount.
    pub unit_price: Decimal,
    /// Line discount, in currency.
    pub discount_amount: Decimal,
    /// ICMS situation code (CST/CSOSN).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icms_situation: Option<String>,
    /// IPI situation code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipi_situation: Option<String>,
    /// PIS situation code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pis_situation: Option<String>,
    /// COFINS situation code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cofins_situation: Option<String>,
    /// State fiscal benefit code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_benefit_code: Option<String>,
}

// -- Response -----------------------------------------------------------------

/// Calculation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculationResponse {
    /// One breakdown per request item, in request order.
    #[serde(default)]
    pub items: Vec<TaxResponseItem>,
    /// Document-level totals.
    pub totals: ResponseTotals,
}

/// Per-line tax breakdown. ICMS-ST carries no rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResponseItem {
    /// Echo of the request item name.
    #[serde(default)]
    pub name: String,
    /// ICMS.
    #[serde(default)]
    pub icms: Option<TaxAmount>,
    /// ICMS tax substitution.
    #[serde(default)]
    pub icms_st: Option<TaxAmount>,
    /// IPI.
    #[serde(default)]
    pub ipi: Option<TaxAmount>,
    /// PIS.
    #[serde(default)]
    pub pis: Option<TaxAmount>,
    /// COFINS.
    #[serde(default)]
    pub cofins: Option<TaxAmount>,
}

/// Document-level totals computed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTotals {
    /// Sum of line amounts.
    pub total_products: Decimal,
    /// Sum of line discounts.
    #[serde(default)]
    pub total_discounts: Decimal,
    /// Sum of all tax components.
    pub total_taxes: Decimal,
}

// -- Client -------------------------------------------------------------------

/// Client for the tax engine.
#[derive(Debug, Clone)]
pub struct TaxEngineClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl TaxEngineClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Calculate taxes for a document.
    ///
    /// Calls `POST {base_url}/tax-engine/api/v1/calculations`. Not retried:
    /// a transport failure is reported to the caller, who decides whether
    /// to issue a fresh request.
    pub async fn calculate(
        &self,
        req: &TaxCalculationRequest,
    ) -> Result<TaxCalculationResponse, FiscoApiError> {
        let endpoint = "POST /calculations";
        let mut segments: Vec<&str> = API_PREFIX.to_vec();
        segments.push("calculations");
        let url = crate::endpoint_url(&self.base_url, &segments)?;

        tracing::debug!(
            items = req.items.len(),
            origin = %req.origin_jurisdiction,
            destination = %req.destination_jurisdiction,
            "sending tax calculation request"
        );

        let resp = self
            .http
            .post(url)
            .json(req)
            .send()
            .await
            .map_err(|e| FiscoApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(crate::api_error(endpoint.into(), resp).await);
        }

        resp.json()
            .await
            .map_err(|e| FiscoApiError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })
    }
}
