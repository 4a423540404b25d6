//! Typed client for payment-term policies.
//!
//! Context path: `/fiscal-config`
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/v1/payment-terms/{id}` | Get policy by ID |

use fisco_core::PaymentTermPolicy;

use crate::error::FiscoApiError;
use crate::retry::{get_with_retry, LookupRetry};

const API_PREFIX: [&str; 3] = ["fiscal-config", "api", "v1"];

/// Client for payment-term policies.
#[derive(Debug, Clone)]
pub struct PaymentTermClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl PaymentTermClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Get a payment-term policy by ID.
    ///
    /// Calls `GET {base_url}/fiscal-config/api/v1/payment-terms/{id}`.
    pub async fn get_policy(&self, id: &str) -> Result<Option<PaymentTermPolicy>, FiscoApiError> {
        let endpoint = format!("GET /payment-terms/{id}");
        let mut segments: Vec<&str> = API_PREFIX.to_vec();
        segments.extend(["payment-terms", id]);
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
