//! Typed client for jurisdiction configuration rows.
//!
//! Context path: `/fiscal-config`
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/v1/operation-natures/{id}/jurisdiction-configs` | All rows for a nature |
//!
//! The service returns the rows unfiltered; picking the applicable one is
//! the resolver's job.

use fisco_core::{JurisdictionConfig, OperationNatureId};

use crate::error::FiscoApiError;
use crate::retry::{get_with_retry, LookupRetry};

const API_PREFIX: [&str; 3] = ["fiscal-config", "api", "v1"];

/// Client for the jurisdiction configuration endpoint.
#[derive(Debug, Clone)]
pub struct JurisdictionConfigClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl JurisdictionConfigClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Fetch every configuration row for an operation nature.
    ///
    /// Calls `GET {base_url}/fiscal-config/api/v1/operation-natures/{id}/jurisdiction-configs`.
    /// A 404 (unknown nature) yields an empty list.
    pub async fn list_for_nature(
        &self,
        nature: &OperationNatureId,
    ) -> Result<Vec<JurisdictionConfig>, FiscoApiError> {
        let endpoint = format!("GET /operation-natures/{nature}/jurisdiction-configs");
        let mut segments: Vec<&str> = API_PREFIX.to_vec();
        segments.extend(["operation-natures", nature.as_str(), "jurisdiction-configs"]);
        let url = crate::endpoint_url(&self.base_url, &segments)?;

        let resp = get_with_retry(&self.http, &url, &endpoint, LookupRetry::default()).await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(%nature, "no configuration rows for operation nature");
            return Ok(Vec::new());
        }

        if !resp.status().is_success() {
            return Err(crate::api_error(endpoint, resp).await);
        }

        resp.json()
            .await
            .map_err(|e| FiscoApiError::Deserialization {
                endpoint,
                source: e,
            })
    }
}
