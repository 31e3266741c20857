/// HTTP client for the dashboard statistics endpoint.
///
/// Uses the synchronous `ureq` client. One call to [`DashboardClient::fetch`]
/// issues exactly one request; there is no retry and no caching.
use std::time::{Duration, Instant};

use super::error::FetchError;
use super::stats::{DashboardStats, StatsEnvelope};
use crate::analytics::logger::{FetchLog, FetchLogEntry};
use crate::auth::AuthContext;

/// Path of the statistics endpoint, relative to the backend base URL.
pub const DASHBOARD_STATS_PATH: &str = "/api/reports/dashboard-stats";

/// Default backend base URL.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Explicit construction options for [`DashboardClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub backend_base_url: String,
    pub timeout: Duration,
    /// Activity log; `None` disables logging.
    pub log: Option<FetchLog>,
}

impl ClientOptions {
    pub fn new(backend_base_url: impl Into<String>) -> Self {
        Self {
            backend_base_url: backend_base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            backend_base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            log: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DashboardClient {
    endpoint: String,
    timeout: Duration,
    log: Option<FetchLog>,
}

impl DashboardClient {
    pub fn new(options: &ClientOptions) -> Self {
        let base = options.backend_base_url.trim_end_matches('/');
        Self {
            endpoint: format!("{base}{DASHBOARD_STATS_PATH}"),
            timeout: options.timeout,
            log: options.log.clone(),
        }
    }

    /// Full URL of the statistics endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the current user's statistics.
    ///
    /// The bearer token is read from `auth` at call time. A missing token
    /// fails without sending a request.
    pub fn fetch(&self, auth: &AuthContext) -> Result<DashboardStats, FetchError> {
        let start = Instant::now();
        let result = self.request(auth);
        let latency_ms = start.elapsed().as_millis() as u64;

        if let Some(log) = &self.log {
            let entry = match &result {
                Ok((status, _)) => FetchLogEntry::success(&self.endpoint, *status, latency_ms),
                Err(err) => {
                    FetchLogEntry::failure(&self.endpoint, latency_ms, err.status_code(), err.kind())
                }
            };
            log.record(&entry);
        }

        result.map(|(_, stats)| stats)
    }

    /// Send the request; returns the HTTP status alongside the payload.
    fn request(&self, auth: &AuthContext) -> Result<(u16, DashboardStats), FetchError> {
        let token = auth.access_token().ok_or(FetchError::MissingToken)?;

        let resp = ureq::get(&self.endpoint)
            .set("Authorization", &format!("Bearer {token}"))
            .set("Accept", "application/json")
            .timeout(self.timeout)
            .call()?;

        // ureq only errors on >= 400; an unfollowed 3xx lands here.
        let status = resp.status();
        if !(200..300).contains(&status) {
            return Err(FetchError::Status { code: status });
        }

        let envelope: StatsEnvelope = resp.into_json().map_err(FetchError::Malformed)?;
        Ok((status, envelope.data))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;

    #[test]
    fn endpoint_joins_base_without_double_slash() {
        let client = DashboardClient::new(&ClientOptions::new("http://api.example.com/"));
        assert_eq!(
            client.endpoint(),
            "http://api.example.com/api/reports/dashboard-stats"
        );
    }

    #[test]
    fn default_options() {
        let options = ClientOptions::default();
        assert_eq!(options.backend_base_url, "http://localhost:8000");
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert!(options.log.is_none());
    }

    #[test]
    fn missing_token_fails_before_request() {
        // Port 9 (discard) is never contacted: the token check comes first.
        let client = DashboardClient::new(&ClientOptions::new("http://127.0.0.1:9"));
        let auth = AuthContext::new(StaticToken::new(""));
        let err = client.fetch(&auth).unwrap_err();
        assert!(matches!(err, FetchError::MissingToken));
    }
}
