//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.echodeck/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct EchodeckConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatConfig {
    pub endpoint: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentsConfig {
    pub base_url: Option<String>,
    pub limit: Option<usize>,
    pub analysis_delay_ms: Option<u64>,
}

/// Values given on the command line. `None` = flag not passed.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub docs_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ENDPOINT: &str = "wss://ws.postman-echo.com/raw";
pub const DEFAULT_DOCS_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_DOCS_LIMIT: usize = 10;
pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 1000;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub docs_base_url: String,
    pub docs_limit: usize,
    pub analysis_delay: Duration,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.echodeck/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".echodeck").join("config.toml"))
}

/// Load config from `~/.echodeck/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `EchodeckConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<EchodeckConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(EchodeckConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(EchodeckConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: EchodeckConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# echodeck configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [chat]
# endpoint = "wss://ws.postman-echo.com/raw"   # Or set ECHODECK_ENDPOINT

# [documents]
# base_url = "https://jsonplaceholder.typicode.com"   # Or set ECHODECK_DOCS_URL
# limit = 10
# analysis_delay_ms = 1000                             # Or set ECHODECK_ANALYSIS_DELAY_MS
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &EchodeckConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable env lookup.
fn resolve_with_env(
    config: &EchodeckConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Endpoint: CLI → env → config → default
    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| env("ECHODECK_ENDPOINT"))
        .or_else(|| config.chat.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    // Documents base URL: CLI → env → config → default
    let docs_base_url = cli
        .docs_url
        .clone()
        .or_else(|| env("ECHODECK_DOCS_URL"))
        .or_else(|| config.documents.base_url.clone())
        .unwrap_or_else(|| DEFAULT_DOCS_BASE_URL.to_string());

    // Analysis delay: env → config → default
    let analysis_delay_ms = env("ECHODECK_ANALYSIS_DELAY_MS")
        .and_then(|raw| match raw.parse::<u64>() {
            Ok(ms) => Some(ms),
            Err(e) => {
                warn!("Ignoring ECHODECK_ANALYSIS_DELAY_MS={:?}: {}", raw, e);
                None
            }
        })
        .or(config.documents.analysis_delay_ms)
        .unwrap_or(DEFAULT_ANALYSIS_DELAY_MS);

    ResolvedConfig {
        endpoint,
        docs_base_url,
        docs_limit: config.documents.limit.unwrap_or(DEFAULT_DOCS_LIMIT),
        analysis_delay: Duration::from_millis(analysis_delay_ms),
    }
}
