//! Service endpoint configuration.
//!
//! Configures base URLs for each upstream service plus the bearer token
//! and the issuing company. Defaults point to the in-cluster service
//! names. Override via environment variables or explicit construction for
//! staging/testing.

use fisco_core::CompanyId;
use url::Url;
use zeroize::Zeroizing;

/// Default request timeout, in seconds, for every upstream call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the upstream services.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct FiscoApiConfig {
    /// Base URL of the tax engine.
    /// Default: <https://tax-engine.fisco.local>
    pub tax_engine_url: Url,
    /// Base URL of the fiscal configuration service (jurisdiction configs,
    /// payment terms).
    pub config_service_url: Url,
    /// Base URL of the partner registry.
    pub partners_url: Url,
    /// Issuing company, sent on every calculation request.
    pub company_id: CompanyId,
    /// Bearer token for API authentication.
    pub api_token: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for FiscoApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FiscoApiConfig")
            .field("tax_engine_url", &self.tax_engine_url)
            .field("config_service_url", &self.config_service_url)
            .field("partners_url", &self.partners_url)
            .field("company_id", &self.company_id)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl FiscoApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `FISCO_TAX_ENGINE_URL` (default: `https://tax-engine.fisco.local`)
    /// - `FISCO_CONFIG_SERVICE_URL` (default: `https://fiscal-config.fisco.local`)
    /// - `FISCO_PARTNERS_URL` (default: `https://partners.fisco.local`)
    /// - `FISCO_COMPANY_ID` (required)
    /// - `FISCO_API_TOKEN` (required)
    /// - `FISCO_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = std::env::var("FISCO_API_TOKEN").map_err(|_| ConfigError::MissingToken)?;
        let company_id = std::env::var("FISCO_COMPANY_ID")
            .map_err(|_| ConfigError::MissingCompanyId)
            .and_then(|raw| {
                CompanyId::new(raw).map_err(|e| ConfigError::InvalidCompanyId(e.to_string()))
            })?;

        Ok(Self {
            tax_engine_url: env_url("FISCO_TAX_ENGINE_URL", "https://tax-engine.fisco.local")?,
            config_service_url: env_url(
                "FISCO_CONFIG_SERVICE_URL",
                "https://fiscal-config.fisco.local",
            )?,
            partners_url: env_url("FISCO_PARTNERS_URL", "https://partners.fisco.local")?,
            company_id,
            api_token: Zeroizing::new(api_token),
            timeout_secs: std::env::var("FISCO_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a configuration pointing to local mock servers (for testing).
    ///
    /// The tax engine listens on `base_port`, the configuration service on
    /// `base_port + 1`, and the partner registry on `base_port + 2`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local_mock(base_port: u16, token: &str) -> Result<Self, ConfigError> {
        let make_url = |port: u16| -> Result<Url, ConfigError> {
            Url::parse(&format!("http://127.0.0.1:{port}"))
                .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))
        };
        Ok(Self {
            tax_engine_url: make_url(base_port)?,
            config_service_url: make_url(base_port.saturating_add(1))?,
            partners_url: make_url(base_port.saturating_add(2))?,
            company_id: CompanyId::new("local-company")
                .map_err(|e| ConfigError::InvalidCompanyId(e.to_string()))?,
            api_token: Zeroizing::new(token.to_string()),
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("FISCO_API_TOKEN environment variable is required")]
    MissingToken,
    #[error("FISCO_COMPANY_ID environment variable is required")]
    MissingCompanyId,
    #[error("invalid company id: {0}")]
    InvalidCompanyId(String),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
