//! Backoff for the idempotent lookup GETs (configuration rows, partners,
//! payment terms).
//!
//! A lookup is retried when the request never produced a response or when
//! the service answered with a transient status (429, 502, 503, 504). Any
//! other status goes straight back to the caller, which maps it. The
//! calculation POST never comes through here: one recompute trigger sends
//! exactly one calculation request.

use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use crate::error::FiscoApiError;

/// Attempt budget and base delay for lookups.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LookupRetry {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub base_delay: Duration,
}

impl Default for LookupRetry {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl LookupRetry {
    fn delay(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(retry))
    }
}

/// Statuses a lookup service returns while overloaded or restarting.
pub(crate) fn is_transient(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// GET `url`, retrying transport failures and transient statuses.
///
/// Returns the last response whatever its status once the budget is spent;
/// a transport failure on the last attempt becomes [`FiscoApiError::Http`]
/// labelled with `endpoint`.
pub(crate) async fn get_with_retry(
    http: &reqwest::Client,
    url: &Url,
    endpoint: &str,
    policy: LookupRetry,
) -> Result<reqwest::Response, FiscoApiError> {
    let mut retry = 0;
    loop {
        let outcome = http.get(url.clone()).send().await;
        let exhausted = retry >= policy.max_retries;

        let reason = match outcome {
            Ok(resp) if exhausted || !is_transient(resp.status()) => return Ok(resp),
            Ok(resp) => format!("status {}", resp.status()),
            Err(source) if exhausted => {
                return Err(FiscoApiError::Http {
                    endpoint: endpoint.to_string(),
                    source,
                })
            }
            Err(e) => e.to_string(),
        };

        let delay = policy.delay(retry);
        retry += 1;
        tracing::warn!(
            %endpoint,
            retry,
            max_retries = policy.max_retries,
            ?delay,
            "lookup failed ({reason}), retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> LookupRetry {
        LookupRetry {
            max_retries: 2,
            base_delay: Duration::from_millis(5),
        }
    }

    #[test]
    fn delays_double_per_retry() {
        let policy = LookupRetry::default();
        assert_eq!(policy.delay(0), Duration::from_millis(200));
        assert_eq!(policy.delay(2), Duration::from_millis(800));
    }

    #[test]
    fn only_overload_statuses_are_transient() {
        assert!(is_transient(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_transient(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_transient(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn closed_port_is_http_error_with_endpoint() {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        // Nothing listens on port 1.
        let url = Url::parse("http://127.0.0.1:1/partners/cli-7").unwrap();

        let err = get_with_retry(&http, &url, "GET /partners/{id}", quick())
            .await
            .unwrap_err();
        assert_eq!(err.endpoint(), Some("GET /partners/{id}"));
        assert!(matches!(err, FiscoApiError::Http { .. }));
    }
}
