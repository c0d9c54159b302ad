//! Narration endpoint configuration and credential resolution
//!
//! ## Configuration Resolution
//!
//! Config is loaded in layers, later layers winning:
//! 1. Embedded defaults (compiled into binary)
//! 2. Override file in data dir (~/.local/share/lumen/config/narration.toml)
//! 3. Environment: `LUMEN_BACKEND`, `LUMEN_NARRATION_URL`, `LUMEN_NARRATION_MODEL`
//!
//! ## Credentials
//!
//! The API key is looked up in `LUMEN_API_KEY`, `GROQ_API_KEY`, then the same
//! keys (plus `GROK_API_KEY`) in a `.env` file in the working directory.
//! Template placeholders count as unset.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/narration.toml");

/// Credential values shipped in templates that mean "not configured"
const PLACEHOLDER_CREDENTIALS: &[&str] = &["your_grok_api_key_here", "YOUR_GROK_API_KEY_HERE"];

/// Environment variables searched for the API key, in order
const CREDENTIAL_ENV_KEYS: &[&str] = &["LUMEN_API_KEY", "GROQ_API_KEY"];

/// Keys searched in the `.env` file, in order
const CREDENTIAL_DOTENV_KEYS: &[&str] = &["LUMEN_API_KEY", "GROQ_API_KEY", "GROK_API_KEY"];

/// Which narration backend to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    OpenaiCompatible,
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::OpenaiCompatible => "openai_compatible",
            BackendKind::Mock => "mock",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai_compatible" | "openai" => Ok(BackendKind::OpenaiCompatible),
            "mock" => Ok(BackendKind::Mock),
            other => Err(Error::Configuration(format!(
                "Unknown backend '{}' (expected openai_compatible or mock)",
                other
            ))),
        }
    }
}

/// Resolved narration settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrationConfig {
    pub backend: BackendKind,
    /// Full chat-completions URL
    pub url: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::OpenaiCompatible,
            url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "mixtral-8x7b-32768".to_string(),
            timeout: Duration::from_secs(30),
            temperature: 0.7,
            max_tokens: 1500,
            top_p: 0.9,
        }
    }
}

impl NarrationConfig {
    /// Load embedded defaults, the data-dir override, then environment
    pub fn load() -> Result<Self> {
        let mut config = Self::embedded()?;
        if let Some(path) = default_config_path() {
            if path.exists() {
                config.merge_file(&path)?;
            }
        }
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        let mut config = Self::default();
        config.merge_toml(DEFAULT_CONFIG)?;
        Ok(config)
    }

    /// Layer a TOML override file on top of the current values
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.merge_toml(&content)?;
        debug!(path = %path.display(), "Applied narration config override");
        Ok(())
    }

    /// Layer TOML content on top of the current values
    pub fn merge_toml(&mut self, content: &str) -> Result<()> {
        let raw: RawConfig = toml::from_str(content)?;

        if let Some(endpoint) = raw.endpoint {
            if let Some(backend) = endpoint.backend {
                self.backend = backend.parse()?;
            }
            if let Some(url) = endpoint.url {
                self.url = url;
            }
            if let Some(model) = endpoint.model {
                self.model = model;
            }
            if let Some(secs) = endpoint.timeout_secs {
                self.timeout = Duration::from_secs(secs);
            }
        }

        if let Some(sampling) = raw.sampling {
            if let Some(temperature) = sampling.temperature {
                self.temperature = temperature;
            }
            if let Some(max_tokens) = sampling.max_tokens {
                self.max_tokens = max_tokens;
            }
            if let Some(top_p) = sampling.top_p {
                self.top_p = top_p;
            }
        }

        Ok(())
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(backend) = non_empty("LUMEN_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(url) = non_empty("LUMEN_NARRATION_URL") {
            self.url = url;
        }
        if let Some(model) = non_empty("LUMEN_NARRATION_MODEL") {
            self.model = model;
        }
        if let Some(secs) = non_empty("LUMEN_NARRATION_TIMEOUT") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::Configuration(format!(
                    "LUMEN_NARRATION_TIMEOUT must be whole seconds, got '{}'",
                    secs
                ))
            })?;
            self.timeout = Duration::from_secs(secs);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    endpoint: Option<RawEndpoint>,
    sampling: Option<RawSampling>,
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
    backend: Option<String>,
    url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawSampling {
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    top_p: Option<f32>,
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("lumen").join("config").join("narration.toml"))
}

/// Where a credential was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Env(&'static str),
    DotEnv(PathBuf),
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Env(key) => write!(f, "environment ({})", key),
            CredentialSource::DotEnv(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A resolved API key
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    key: String,
    source: CredentialSource,
}

impl Credential {
    /// Wrap a key, rejecting empty values and template placeholders
    pub fn new(key: impl Into<String>, source: CredentialSource) -> Option<Self> {
        let key: String = key.into();
        let key = key.trim().to_string();
        if is_placeholder(&key) {
            return None;
        }
        Some(Self { key, source })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    /// First few characters, for logs
    pub fn redacted(&self) -> String {
        let prefix: String = self.key.chars().take(4).collect();
        format!("{}…", prefix)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("key", &self.redacted())
            .field("source", &self.source)
            .finish()
    }
}

/// Whether a credential value is unset or a template placeholder
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || PLACEHOLDER_CREDENTIALS.contains(&value)
}

/// Resolve the API key from the process environment and `./.env`
pub fn resolve_credential() -> Option<Credential> {
    resolve_credential_with(|key| std::env::var(key).ok(), Path::new(".env"))
}

/// Resolve the API key through an env lookup and a `.env` path
pub fn resolve_credential_with<F>(lookup: F, dotenv_path: &Path) -> Option<Credential>
where
    F: Fn(&str) -> Option<String>,
{
    for &key in CREDENTIAL_ENV_KEYS {
        let credential = lookup(key).and_then(|v| Credential::new(v, CredentialSource::Env(key)));
        if let Some(credential) = credential {
            debug!(source = %credential.source(), "Resolved API credential");
            return Some(credential);
        }
    }

    let content = fs::read_to_string(dotenv_path).ok()?;
    let vars = parse_dotenv(&content);
    CREDENTIAL_DOTENV_KEYS.iter().find_map(|key| {
        vars.get(*key).and_then(|v| {
            Credential::new(v.clone(), CredentialSource::DotEnv(dotenv_path.to_path_buf()))
        })
    })
}

/// Parse `KEY=VALUE` lines, skipping blanks and `#` comments and stripping
/// matching quotes around values
pub fn parse_dotenv(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let key = key.trim().trim_start_matches("export ").trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
