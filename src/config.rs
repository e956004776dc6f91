use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Environment variable holding the chat-completion API credential
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// User agent sent on direct fetches and by the headless browser
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

/// Direct-fetch timeout the summarizer uses unless configured otherwise
pub const SUMMARY_HTTP_TIMEOUT_SECS: u64 = 10;

/// How raw HTML is retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Plain HTTP GET, no script execution
    Http,
    /// Headless browser over WebDriver, returns the rendered DOM
    Browser,
}

/// Configuration for the page fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_mode")]
    pub mode: FetchMode,

    /// Timeout for the direct HTTP GET
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// How long to wait for the rendered document body
    #[serde(default = "default_render_wait_secs")]
    pub render_wait_secs: u64,

    /// Upper bound for a whole browser navigation
    #[serde(default = "default_browser_timeout_secs")]
    pub browser_timeout_secs: u64,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Top-level configuration shared by both binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: u32,

    #[serde(default = "default_brochure_max_tokens")]
    pub brochure_max_tokens: u32,

    /// Links sent for relevance analysis during brochure generation
    #[serde(default = "default_brochure_link_limit")]
    pub brochure_link_limit: usize,

    /// Pause after each sub-page fetch
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    #[serde(default)]
    pub fetch: FetchConfig,
}

fn default_fetch_mode() -> FetchMode {
    FetchMode::Http
}

fn default_http_timeout_secs() -> u64 {
    15
}

fn default_render_wait_secs() -> u64 {
    20
}

fn default_browser_timeout_secs() -> u64 {
    45
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_base_url() -> String {
    crate::llm::openai::DEFAULT_BASE_URL.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_summary_max_tokens() -> u32 {
    1000
}

fn default_brochure_max_tokens() -> u32 {
    2000
}

fn default_brochure_link_limit() -> usize {
    50
}

fn default_politeness_delay_ms() -> u64 {
    1000
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            mode: default_fetch_mode(),
            http_timeout_secs: default_http_timeout_secs(),
            render_wait_secs: default_render_wait_secs(),
            browser_timeout_secs: default_browser_timeout_secs(),
            webdriver_url: default_webdriver_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    /// Create a configuration for the given mode with default values
    pub fn new(mode: FetchMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if set
    pub fn apply_env_overrides(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base_url: default_api_base_url(),
            temperature: default_temperature(),
            summary_max_tokens: default_summary_max_tokens(),
            brochure_max_tokens: default_brochure_max_tokens(),
            brochure_link_limit: default_brochure_link_limit(),
            politeness_delay_ms: default_politeness_delay_ms(),
            fetch: FetchConfig::default(),
        }
    }
}

impl DigestConfig {
    /// Defaults for the page summarizer: direct HTTP with a 10 second timeout
    pub fn for_summary() -> Self {
        let mut config = Self::default();
        config.fetch.http_timeout_secs = SUMMARY_HTTP_TIMEOUT_SECS;
        config
    }

    /// Defaults for the brochure generator: pages rendered in a headless browser
    pub fn for_brochure() -> Self {
        let mut config = Self::default();
        config.fetch.mode = FetchMode::Browser;
        config
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_file_over(path, &Self::default())
    }

    /// Load a JSON file whose fields override `base`
    pub fn from_file_over<P: AsRef<Path>>(path: P, base: &Self) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json_over(&contents, base)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::from_json_over(json, &Self::default())
    }

    /// Parse a JSON string whose fields override `base`; absent fields keep
    /// the value from `base`
    pub fn from_json_over(json: &str, base: &Self) -> Result<Self, ConfigError> {
        let overlay: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(base)?;
        merge_json(&mut merged, overlay);
        Ok(serde_json::from_value(merged)?)
    }

    /// Load from an optional file over `base`, then apply environment overrides
    pub fn load(path: Option<&Path>, base: Self) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file_over(path, &base)?,
            None => base,
        };
        config.fetch.apply_env_overrides();
        Ok(config)
    }
}

/// Recursively copy the fields of `overlay` onto `base`
fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// A validated API credential
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Read the key from the environment after loading a `.env` file
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv_override() {
            Ok(path) => ::log::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => ::log::debug!("No .env file found"),
            Err(e) => ::log::warn!("Could not load .env file: {}", e),
        }

        Self::validate(std::env::var(API_KEY_VAR).ok())
    }

    /// Absence and embedded whitespace are fatal; an unusual prefix only warns
    pub fn validate(raw: Option<String>) -> Result<Self, ConfigError> {
        let key = match raw {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ConfigError::MissingApiKey),
        };

        if key.chars().any(char::is_whitespace) {
            return Err(ConfigError::MalformedApiKey);
        }

        if !key.starts_with("sk-") || key.len() <= 10 {
            ::log::warn!(
                "{} format looks unusual. Please double-check your key in the .env file.",
                API_KEY_VAR
            );
        }

        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(5).collect();
        write!(f, "ApiKey({}...)", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = DigestConfig::from_json("{}").unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.brochure_link_limit, 50);
        assert_eq!(config.fetch.mode, FetchMode::Http);
        assert_eq!(config.fetch.render_wait_secs, 20);
        assert_eq!(config.fetch.webdriver_url, "http://localhost:4444");
    }

    #[test]
    fn test_partial_json_overrides() {
        let json = r#"{"model": "gpt-4o", "fetch": {"mode": "browser", "http_timeout_secs": 10}}"#;
        let config = DigestConfig::from_json(json).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.fetch.mode, FetchMode::Browser);
        assert_eq!(config.fetch.http_timeout_secs, 10);
        assert_eq!(config.fetch.user_agent, BROWSER_USER_AGENT);
        assert_eq!(config.summary_max_tokens, 1000);
    }

    #[test]
    fn test_summary_defaults_use_shorter_timeout() {
        let config = DigestConfig::for_summary();
        assert_eq!(config.fetch.mode, FetchMode::Http);
        assert_eq!(config.fetch.http_timeout_secs, SUMMARY_HTTP_TIMEOUT_SECS);
        assert_eq!(DigestConfig::default().fetch.http_timeout_secs, 15);
    }

    #[test]
    fn test_file_fields_override_tool_defaults() {
        let config =
            DigestConfig::from_json_over(r#"{"model": "gpt-4o"}"#, &DigestConfig::for_summary())
                .unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.fetch.http_timeout_secs, 10);

        let config = DigestConfig::from_json_over(
            r#"{"fetch": {"http_timeout_secs": 30}}"#,
            &DigestConfig::for_summary(),
        )
        .unwrap();
        assert_eq!(config.fetch.http_timeout_secs, 30);
        assert_eq!(config.fetch.mode, FetchMode::Http);
    }

    #[test]
    fn test_file_mode_survives_brochure_defaults() {
        let brochure = DigestConfig::for_brochure();
        assert_eq!(brochure.fetch.mode, FetchMode::Browser);

        let config =
            DigestConfig::from_json_over(r#"{"fetch": {"mode": "http"}}"#, &brochure).unwrap();
        assert_eq!(config.fetch.mode, FetchMode::Http);
        assert_eq!(config.fetch.render_wait_secs, 20);

        let config = DigestConfig::from_json_over("{}", &brochure).unwrap();
        assert_eq!(config.fetch.mode, FetchMode::Browser);
    }

    #[test]
    fn test_load_without_file_keeps_base() {
        let config = DigestConfig::load(None, DigestConfig::for_brochure()).unwrap();
        assert_eq!(config.fetch.mode, FetchMode::Browser);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = DigestConfig::from_json(r#"{"fetch": {"mode": "carrier-pigeon"}}"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.json");
        std::fs::write(&path, r#"{"politeness_delay_ms": 0}"#).unwrap();

        let config = DigestConfig::from_file(&path).unwrap();
        assert_eq!(config.politeness_delay_ms, 0);

        let missing = DigestConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(
            ApiKey::validate(None),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(matches!(
            ApiKey::validate(Some(String::new())),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_api_key_with_whitespace_is_rejected() {
        let result = ApiKey::validate(Some("sk-proj-abc def".to_string()));
        assert!(matches!(result, Err(ConfigError::MalformedApiKey)));

        let result = ApiKey::validate(Some("sk-proj-abcdef\n".to_string()));
        assert!(matches!(result, Err(ConfigError::MalformedApiKey)));
    }

    #[test]
    fn test_unusual_prefix_is_accepted() {
        let key = ApiKey::validate(Some("not-an-openai-key".to_string())).unwrap();
        assert_eq!(key.expose(), "not-an-openai-key");
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let key = ApiKey::validate(Some("sk-proj-supersecret".to_string())).unwrap();
        let shown = format!("{:?}", key);
        assert!(!shown.contains("supersecret"));
    }
}
