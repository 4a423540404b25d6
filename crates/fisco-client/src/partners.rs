//! Typed client for the partner registry.
//!
//! Context path: `/partners`
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/v1/partners/{id}` | Get partner by ID |
//!
//! Only the address is of interest here: its state code becomes the
//! document's destination jurisdiction.

use fisco_core::{ClientId, JurisdictionCode};
use serde::{Deserialize, Serialize};

use crate::error::FiscoApiError;
use crate::retry::{get_with_retry, LookupRetry};

const API_PREFIX: [&str; 3] = ["partners", "api", "v1"];

/// Partner record. The registry returns many more fields; only the ones
/// the engine reads are modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    /// Registry identifier.
    pub id: ClientId,
    /// Legal or trade name.
    pub name: String,
    /// Main address, when registered.
    #[serde(default)]
    pub address: Option<PartnerAddress>,
}

impl Partner {
    /// The state of the partner's address, when it has one.
    pub fn jurisdiction(&self) -> Option<&JurisdictionCode> {
        self.address.as_ref().map(|a| &a.jurisdiction_code)
    }
}

/// Partner postal address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerAddress {
    /// Street and number.
    #[serde(default)]
    pub street: Option<String>,
    /// City name.
    #[serde(default)]
    pub city: Option<String>,
    /// CEP.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Two-letter state code.
    pub jurisdiction_code: JurisdictionCode,
}

/// Client for the partner registry.
#[derive(Debug, Clone)]
pub struct PartnerClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl PartnerClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Get a partner by ID.
    ///
    /// Calls `GET {base_url}/partners/api/v1/partners/{id}`.
    pub async fn get_partner(&self, id: &ClientId) -> Result<Option<Partner>, FiscoApiError> {
        let endpoint = format!("GET /partners/{id}");
        let mut segments: Vec<&str> = API_PREFIX.to_vec();
        segments.extend(["partners", id.as_str()]);
        let url = crate::endpoint_url(&self.base_url, &segments)?;

        let resp = get_with_retry(&self.http, &url, &endpoint, LookupRetry::default()).await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            return Err(crate::api_error(endpoint, resp).await);
        }

        resp.json()
            .await
            .map(Some)
            .map_err(|e| FiscoApiError::Deserialization {
                endpoint,
                source: e,
            })
    }
}
