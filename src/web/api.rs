//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use crate::dashboard::{self, DashboardState};

use super::{WebContext, content_type_json};

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Health API response.
#[derive(Serialize)]
struct HealthResponse {
    version: &'static str,
    endpoint: String,
    token_present: bool,
    signed_in_as: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/dashboard` — mount, fetch once, return the resulting state.
///
/// A failed fetch is still a `200` carrying `{"state":"failed"}`; the page
/// renders it as the failure state.
pub fn get_dashboard(ctx: &WebContext) -> Result<Response<Cursor<Vec<u8>>>> {
    let state: DashboardState = dashboard::load(&ctx.client, &ctx.auth);
    json_response(&state)
}

/// `GET /api/health` — configuration summary, no backend call.
pub fn get_health(ctx: &WebContext) -> Result<Response<Cursor<Vec<u8>>>> {
    let resp = HealthResponse {
        version: env!("CARGO_PKG_VERSION"),
        endpoint: ctx.client.endpoint().to_string(),
        token_present: ctx.auth.access_token().is_some(),
        signed_in_as: ctx.auth.full_name.clone(),
    };

    json_response(&resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            version: "0.1.0",
            endpoint: "http://localhost:8000/api/reports/dashboard-stats".to_string(),
            token_present: false,
            signed_in_as: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["token_present"], false);
        assert!(json["signed_in_as"].is_null());
        assert!(json["endpoint"].as_str().unwrap().ends_with("/dashboard-stats"));
    }
}
