//! # fisco-client -- Typed Rust clients for the Fisco upstream services
//!
//! Provides typed access to the services the fiscal engine consumes:
//! - **Tax engine** (`tax-engine/api/v1`): per-line tax calculation
//! - **Fiscal configuration** (`fiscal-config/api/v1`): jurisdiction
//!   configuration rows and payment-term policies
//! - **Partners** (`partners/api/v1`): client addresses, used to derive
//!   the destination jurisdiction
//!
//! ## Architecture
//!
//! This crate owns the wire format and nothing else. Selecting a
//! configuration row, sequencing calculations, and mapping responses onto
//! documents belong to `fisco-engine`.
//!
//! ## Timeouts and Retries
//!
//! All sub-clients share one `reqwest::Client` carrying the bearer token
//! and a request timeout (default 30s). GET lookups are retried on
//! transport errors with exponential backoff; the calculation POST is
//! sent once.

pub mod config;
pub mod error;
pub mod jurisdiction_configs;
pub mod partners;
pub mod payment_terms;
pub(crate) mod retry;
pub mod tax_engine;

pub use config::FiscoApiConfig;
pub use error::FiscoApiError;
pub use jurisdiction_configs::JurisdictionConfigClient;
pub use partners::{Partner, PartnerAddress, PartnerClient};
pub use payment_terms::PaymentTermClient;
pub use tax_engine::{
    ResponseTotals, TaxCalculationRequest, TaxCalculationResponse, TaxEngineClient,
    TaxRequestItem, TaxResponseItem,
};

use std::time::Duration;

use fisco_core::CompanyId;
use url::Url;

/// Top-level client. Holds sub-clients for each upstream service.
#[derive(Debug, Clone)]
pub struct FiscoClient {
    company_id: CompanyId,
    tax_engine: TaxEngineClient,
    jurisdiction_configs: JurisdictionConfigClient,
    partners: PartnerClient,
    payment_terms: PaymentTermClient,
}

impl FiscoClient {
    /// Create a client from configuration.
    pub fn new(config: FiscoApiConfig) -> Result<Self, FiscoApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!(
                        "Bearer {}",
                        config.api_token.as_str()
                    ))
                    .map_err(|_| FiscoApiError::Config(config::ConfigError::MissingToken))?,
                );
                headers
            })
            .build()
            .map_err(|e| FiscoApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            company_id: config.company_id,
            tax_engine: TaxEngineClient::new(http.clone(), config.tax_engine_url),
            // Jurisdiction configs and payment terms are both served by the
            // fiscal configuration service.
            jurisdiction_configs: JurisdictionConfigClient::new(
                http.clone(),
                config.config_service_url.clone(),
            ),
            partners: PartnerClient::new(http.clone(), config.partners_url),
            payment_terms: PaymentTermClient::new(http, config.config_service_url),
        })
    }

    /// The issuing company configured for this client.
    pub fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    /// Access the tax engine client.
    pub fn tax_engine(&self) -> &TaxEngineClient {
        &self.tax_engine
    }

    /// Access the jurisdiction configuration client.
    pub fn jurisdiction_configs(&self) -> &JurisdictionConfigClient {
        &self.jurisdiction_configs
    }

    /// Access the partner registry client.
    pub fn partners(&self) -> &PartnerClient {
        &self.partners
    }

    /// Access the payment-term client.
    pub fn payment_terms(&self) -> &PaymentTermClient {
        &self.payment_terms
    }
}

/// Append percent-encoded path segments to a base URL.
pub(crate) fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url, FiscoApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| {
            FiscoApiError::Config(config::ConfigError::InvalidUrl(
                base.to_string(),
                "URL cannot be a base".to_string(),
            ))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Read the body of a non-2xx response into an [`FiscoApiError::ApiError`].
pub(crate) async fn api_error(endpoint: String, resp: reqwest::Response) -> FiscoApiError {
    let status = resp.status().as_u16();
    let body = resp
        .text()
        .await
        .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
    FiscoApiError::ApiError {
        endpoint,
        status,
        body,
    }
}
