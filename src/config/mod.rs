/// Configuration system for resonanze.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::ResonanzeConfig::default()`]
/// 2. **User global config** — `~/.resonanze/config.toml`
/// 3. **Project local config** — `.resonanze.toml` in the current working directory
/// 4. **Environment variables** — `RESONANZE_*` overrides (highest precedence)
///
/// Later layers override earlier ones at the key level: a project file that
/// only sets `backend.base_url` keeps the global file's `auth` section.
///
/// The dashboard core never reads configuration itself. The binary resolves
/// it here and passes the result in through [`client_options`] and
/// [`auth_context`].
///
/// # Usage
///
/// ```rust,ignore
/// use resonanze::config;
///
/// let cfg = config::load();
/// let client = DashboardClient::new(&config::client_options(&cfg));
/// let auth = config::auth_context(&cfg);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

pub use schema::ResonanzeConfig;

use crate::analytics::logger::FetchLog;
use crate::auth::{AuthContext, EnvOrFileToken};
use crate::dashboard::ClientOptions;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. Malformed files are ignored.
pub fn load() -> ResonanzeConfig {
    let layers = [global_config_path(), project_config_path()];
    let mut config = load_layers(layers.iter().flatten().map(PathBuf::as_path));
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

/// Merge the given TOML files over the defaults, in order.
pub fn load_layers<'a>(paths: impl IntoIterator<Item = &'a Path>) -> ResonanzeConfig {
    let mut merged = toml::Value::Table(toml::map::Map::new());
    for path in paths {
        if let Some(layer) = load_toml_value(path) {
            merge_values(&mut merged, layer);
        }
    }
    merged.try_into().unwrap_or_default()
}

/// Parse a TOML file as a raw value tree.
///
/// Returns `None` if the file doesn't exist or is malformed, or if it
/// doesn't deserialize into the config schema.
fn load_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str::<ResonanzeConfig>(&content).ok()?;
    toml::from_str(&content).ok()
}

/// Overlay `overlay` onto `base`: tables merge key by key, everything else
/// is replaced.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.resonanze/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".resonanze").join("config.toml"))
}

/// Path to the project local config: `.resonanze.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".resonanze.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `RESONANZE_BACKEND_URL` — backend base URL
/// - `RESONANZE_TIMEOUT_MS` — request timeout
/// - `RESONANZE_LOG` — fetch activity log on/off (`1`/`true`/`yes`/`on`)
///
/// `lookup` resolves a variable name; the binary passes `std::env::var`.
pub fn apply_env_overrides(config: &mut ResonanzeConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("RESONANZE_BACKEND_URL")
        && !val.is_empty()
    {
        config.backend.base_url = val;
    }
    if let Some(val) = lookup("RESONANZE_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.backend.timeout_ms = ms;
    }
    if let Some(val) = lookup("RESONANZE_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Injection into the dashboard core
// ---------------------------------------------------------------------------

/// Client construction options derived from the resolved config.
pub fn client_options(config: &ResonanzeConfig) -> ClientOptions {
    let log = config
        .logging
        .enabled
        .then(|| FetchLog::new(expand_home(&config.logging.path)));

    ClientOptions {
        backend_base_url: config.backend.base_url.clone(),
        timeout: Duration::from_millis(config.backend.timeout_ms),
        log,
    }
}

/// Auth context for the configured user.
///
/// The token comes from `RESONANZE_ACCESS_TOKEN`, falling back to
/// `auth.token_file`; it is read again on every fetch.
pub fn auth_context(config: &ResonanzeConfig) -> AuthContext {
    let token_file = (!config.auth.token_file.is_empty())
        .then(|| expand_home(&config.auth.token_file));

    AuthContext::new(EnvOrFileToken::new(token_file)).with_user(
        Some(config.auth.user_id.clone()),
        Some(config.auth.full_name.clone()),
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.resonanze/config.toml`.
///
/// Creates the `~/.resonanze/` directory if it doesn't exist. Returns an
/// error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    write_default_config(&path, force)?;
    Ok(path)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, ResonanzeConfig::default_toml()).context("failed to write config file")
}

/// Set a single config key to a value in the global config file.
///
/// Supports dotted keys like `backend.base_url`. The existing value's type
/// decides how `value` is parsed.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_in(&path, key, value)
}

/// [`set_config_value`] against an explicit file.
///
/// A missing file starts from the serialized defaults.
pub fn set_config_value_in(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = if path.exists() {
        fs::read_to_string(path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&ResonanzeConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config key must be `section.key`, got '{key}'");
    };

    let mut current = root;
    for part in section.split('.') {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{section}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("unsupported value type at '{key}'"),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("resonanze-config-{}", std::process::id()))
            .join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn no_layers_yields_defaults() {
        let config = load_layers(std::iter::empty());
        assert_eq!(config, ResonanzeConfig::default());
    }

    #[test]
    fn project_layer_overrides_only_its_keys() {
        let dir = temp_dir("layers");
        let global = dir.join("global.toml");
        let project = dir.join("project.toml");
        fs::write(
            &global,
            "[backend]\ntimeout_ms = 2500\n[auth]\nfull_name = \"Ada\"\n",
        )
        .unwrap();
        fs::write(&project, "[backend]\nbase_url = \"https://api.example.com\"\n").unwrap();

        let config = load_layers([global.as_path(), project.as_path()]);
        assert_eq!(config.backend.base_url, "https://api.example.com");
        assert_eq!(config.backend.timeout_ms, 2500);
        assert_eq!(config.auth.full_name, "Ada");
    }

    #[test]
    fn malformed_layer_is_ignored() {
        let dir = temp_dir("malformed");
        let bad = dir.join("bad.toml");
        fs::write(&bad, "[backend\nbase_url = ").unwrap();
        let wrong_type = dir.join("wrong.toml");
        fs::write(&wrong_type, "[backend]\ntimeout_ms = \"soon\"\n").unwrap();

        let config = load_layers([bad.as_path(), wrong_type.as_path()]);
        assert_eq!(config, ResonanzeConfig::default());
    }

    #[test]
    fn env_overrides_replace_backend_and_timeout() {
        let mut config = ResonanzeConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("RESONANZE_BACKEND_URL", "https://voice.example.org"),
                ("RESONANZE_TIMEOUT_MS", "1500"),
                ("RESONANZE_LOG", "off"),
            ]),
        );
        assert_eq!(config.backend.base_url, "https://voice.example.org");
        assert_eq!(config.backend.timeout_ms, 1500);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut config = ResonanzeConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("RESONANZE_BACKEND_URL", ""), ("RESONANZE_TIMEOUT_MS", "fast")]),
        );
        assert_eq!(config, ResonanzeConfig::default());
    }

    #[test]
    fn is_truthy_accepts_variants() {
        for val in ["1", "true", "TRUE", "yes", "on", "ON"] {
            assert!(is_truthy(val), "{val}");
        }
        for val in ["0", "false", "no", "off", ""] {
            assert!(!is_truthy(val), "{val}");
        }
    }

    #[test]
    fn client_options_follow_config() {
        let mut config = ResonanzeConfig::default();
        config.backend.base_url = "http://10.0.0.2:8000".to_string();
        config.backend.timeout_ms = 750;
        config.logging.path = "/tmp/resonanze-fetch.jsonl".to_string();

        let options = client_options(&config);
        assert_eq!(options.backend_base_url, "http://10.0.0.2:8000");
        assert_eq!(options.timeout, Duration::from_millis(750));
        assert_eq!(
            options.log.as_ref().map(|l| l.path().to_path_buf()),
            Some(PathBuf::from("/tmp/resonanze-fetch.jsonl"))
        );

        config.logging.enabled = false;
        assert!(client_options(&config).log.is_none());
    }

    #[test]
    fn auth_context_drops_blank_identity() {
        let mut config = ResonanzeConfig::default();
        config.auth.full_name = "Ada Lovelace".to_string();
        let auth = auth_context(&config);
        assert_eq!(auth.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(auth.user_id, None);
    }

    #[test]
    fn expand_home_only_touches_tilde_prefix() {
        assert_eq!(expand_home("/var/log/x"), PathBuf::from("/var/log/x"));
        assert_eq!(expand_home("rel/~/x"), PathBuf::from("rel/~/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.resonanze/t"), home.join(".resonanze/t"));
        }
    }

    #[test]
    fn set_toml_value_keeps_types() {
        let mut root: toml::Value =
            toml::from_str(&toml::to_string_pretty(&ResonanzeConfig::default()).unwrap()).unwrap();

        set_toml_value(&mut root, "backend.timeout_ms", "50").unwrap();
        set_toml_value(&mut root, "logging.enabled", "no").unwrap();
        set_toml_value(&mut root, "backend.base_url", "http://h:1").unwrap();

        assert_eq!(root["backend"]["timeout_ms"].as_integer(), Some(50));
        assert_eq!(root["logging"]["enabled"].as_bool(), Some(false));
        assert_eq!(root["backend"]["base_url"].as_str(), Some("http://h:1"));
    }

    #[test]
    fn set_toml_value_rejects_bad_input() {
        let mut root: toml::Value =
            toml::from_str(&toml::to_string_pretty(&ResonanzeConfig::default()).unwrap()).unwrap();

        assert!(set_toml_value(&mut root, "nonexistent.key", "v").is_err());
        assert!(set_toml_value(&mut root, "backend.unknown", "v").is_err());
        assert!(set_toml_value(&mut root, "backend", "v").is_err());
        assert!(set_toml_value(&mut root, "backend.timeout_ms", "soon").is_err());
    }

    #[test]
    fn set_value_in_missing_file_starts_from_defaults() {
        let dir = temp_dir("set");
        let path = dir.join("config.toml");

        set_config_value_in(&path, "auth.full_name", "Grace Hopper").unwrap();
        let config = load_layers([path.as_path()]);
        assert_eq!(config.auth.full_name, "Grace Hopper");
        assert_eq!(config.backend, schema::BackendConfig::default());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = temp_dir("init");
        let path = dir.join("config.toml");

        write_default_config(&path, false).unwrap();
        assert!(write_default_config(&path, false).is_err());
        write_default_config(&path, true).unwrap();
        assert_eq!(load_layers([path.as_path()]), ResonanzeConfig::default());
    }
}
