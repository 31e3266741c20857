/// Configuration schema and defaults.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[backend]`, `[auth]`, `[logging]` and `[web]`. Every field has a
/// built-in default; users only set what they want to override.
use serde::{Deserialize, Serialize};

use crate::dashboard::client::{DEFAULT_BACKEND_URL, DEFAULT_TIMEOUT_MS};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration, mapping to `~/.resonanze/config.toml` and
/// `.resonanze.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResonanzeConfig {
    pub backend: BackendConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub web: WebConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Backend REST API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL the `/api/...` paths are appended to.
    pub base_url: String,
    /// Request timeout (milliseconds).
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// [auth]
// ---------------------------------------------------------------------------

/// Where the access token lives and who the user is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// File holding the bearer token. `~` expands to the home directory.
    /// `RESONANZE_ACCESS_TOKEN` takes precedence when set.
    pub token_file: String,
    /// User id of the signed-in user (display only).
    pub user_id: String,
    /// Full name shown in the dashboard greeting.
    pub full_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_file: "~/.resonanze/access-token".to_string(),
            user_id: String::new(),
            full_name: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Fetch activity log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether fetch attempts are logged.
    pub enabled: bool,
    /// Path to the JSONL log file. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.resonanze/fetch-log.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Local web dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address for `resonanze serve`.
    pub addr: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl ResonanzeConfig {
    /// The default config as annotated TOML, written by `config init`.
    pub fn default_toml() -> String {
        r#"# resonanze configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (RESONANZE_*)
#   2. Project config (.resonanze.toml in current directory)
#   3. User global config (~/.resonanze/config.toml)
#   4. Built-in defaults

[backend]
base_url = "http://localhost:8000"    # or RESONANZE_BACKEND_URL
timeout_ms = 10000                    # or RESONANZE_TIMEOUT_MS

[auth]
token_file = "~/.resonanze/access-token"   # RESONANZE_ACCESS_TOKEN wins when set
user_id = ""
full_name = ""

[logging]
enabled = true                        # or RESONANZE_LOG=0
path = "~/.resonanze/fetch-log.jsonl"

[web]
addr = "127.0.0.1:9747"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_back() {
        let config: ResonanzeConfig = toml::from_str(&ResonanzeConfig::default_toml()).unwrap();
        assert_eq!(config, ResonanzeConfig::default());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ResonanzeConfig = toml::from_str(
            r#"
[backend]
base_url = "https://api.resonanze.app"
"#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "https://api.resonanze.app");
        assert_eq!(config.backend.timeout_ms, 10_000);
        assert!(config.logging.enabled);
        assert_eq!(config.web.addr, "127.0.0.1:9747");
    }

    #[test]
    fn serialized_defaults_round_trip() {
        let toml_str = toml::to_string_pretty(&ResonanzeConfig::default()).unwrap();
        let back: ResonanzeConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back, ResonanzeConfig::default());
    }
}
