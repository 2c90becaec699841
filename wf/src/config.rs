//! Wayfinder configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main Wayfinder configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Pipeline thresholds and defaults
    pub agent: AgentConfig,

    /// External service endpoints
    pub services: ServicesConfig,

    /// Prompt template overrides
    pub prompts: PromptsConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the required API-key environment variables are set. Call
    /// this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        for (what, env) in [
            ("LLM", &self.llm.api_key_env),
            ("route service", &self.services.route.api_key_env),
            ("places service", &self.services.places.api_key_env),
        ] {
            if std::env::var(env).is_err() {
                return Err(eyre::eyre!(
                    "{} API key not found. Set the {} environment variable.",
                    what,
                    env
                ));
            }
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    ///
    /// Explicit `--config` path, then `./.wayfinder.yml`, then
    /// `~/.config/wayfinder/wayfinder.yml`, then built-in defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from(".wayfinder.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("wayfinder").join("wayfinder.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "openrouter" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openrouter".to_string(),
            model: "google/gemma-3-27b-it".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            max_tokens: 2048,
            temperature: 0.7,
            timeout_ms: 60_000,
        }
    }
}

/// Pipeline thresholds and defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Recent turns included when building prompts
    #[serde(rename = "history-window")]
    pub history_window: usize,

    /// Off-topic count at which replies start carrying a warning
    #[serde(rename = "off-topic-warn-threshold")]
    pub off_topic_warn_threshold: u32,

    /// Off-topic count at which the conversation is refused
    #[serde(rename = "off-topic-stop-threshold")]
    pub off_topic_stop_threshold: u32,

    /// Maximum re-entrant passes after a tool call
    #[serde(rename = "max-tool-depth")]
    pub max_tool_depth: u32,

    /// Default place-search radius in meters (five miles)
    #[serde(rename = "default-radius-meters")]
    pub default_radius_meters: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            history_window: sessionstore::DEFAULT_HISTORY_WINDOW,
            off_topic_warn_threshold: 5,
            off_topic_stop_threshold: 8,
            max_tool_depth: 1,
            default_radius_meters: 8047.0,
        }
    }
}

/// External service endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub route: ServiceEndpoint,
    pub places: ServiceEndpoint,
}

/// One external service endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoint {
    /// Service base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for ServiceEndpoint {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key_env: String::new(),
            timeout_ms: 30_000,
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            route: ServiceEndpoint {
                base_url: "https://api.tomtom.com".to_string(),
                api_key_env: "TOMTOM_API_KEY".to_string(),
                timeout_ms: 30_000,
            },
            places: ServiceEndpoint {
                base_url: "https://browse.search.hereapi.com/v1".to_string(),
                api_key_env: "HERE_API_KEY".to_string(),
                timeout_ms: 30_000,
            },
        }
    }
}

/// Prompt template overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory with `.pmt` files overriding the embedded templates
    pub dir: Option<PathBuf>,
}
