//! Configuration management for Ice Breaker.
//!
//! Configuration is read once at startup from environment variables
//! (optionally seeded from a `.env` file):
//! - `API_KEY` - Required. Azure OpenAI / APIM subscription key.
//! - `AZURE_ENDPOINT` - Required. Azure OpenAI endpoint (or a full chat completions URL).
//! - `MODEL_NAME` - Required. Deployment name of the chat model.
//! - `API_VERSION` - Optional. Defaults to `2024-02-01`.
//! - `TAVILY_API_KEY` - Optional. Enables Tavily search; DuckDuckGo is used otherwise.
//! - `PROFILE_SOURCE` - Optional. `fixture` (default) or `proxycurl`.
//! - `PROXYCURL_API_KEY` - Required when `PROFILE_SOURCE=proxycurl`.
//! - `LINKEDIN_FIXTURE_URL` / `TWITTER_FIXTURE_URL` - Optional fixture overrides.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `5000`.
//! - `MAX_ITERATIONS` - Optional. Lookup agent loop bound. Defaults to `10`.
//! - `LLM_TIMEOUT_SECS` - Optional. Per-call LLM timeout. Defaults to `60`.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_VERSION: &str = "2024-02-01";

pub const DEFAULT_LINKEDIN_FIXTURE_URL: &str = "https://gist.githubusercontent.com/emarco177/0d6a3f93dd06634d95e46a2782ed7490/raw/78233eb934aa9850b689471a604465b188e761a0/eden-marco.json";

pub const DEFAULT_TWITTER_FIXTURE_URL: &str = "https://gist.githubusercontent.com/emarco177/827323bb599553d0f0e662da07b9ff68/raw/57bf38cf8acce0c87e060f9bb51f6ab72098fbd6/eden-marco-twitter.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Azure OpenAI chat completion settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,

    /// API key, also sent as the APIM subscription key
    pub api_key: String,

    /// Deployment (model) name
    pub deployment: String,

    /// `api-version` query parameter
    pub api_version: String,

    /// Timeout applied to every completion request
    pub timeout: Duration,
}

/// Which backend serves LinkedIn profile data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSourceKind {
    /// Static JSON fixture fetched from a fixed URL
    Fixture { url: String },
    /// Live Proxycurl API
    Proxycurl { api_key: String },
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM provider settings
    pub llm: LlmConfig,

    /// Tavily key; `None` falls back to key-less DuckDuckGo search
    pub tavily_api_key: Option<String>,

    /// Profile data backend
    pub profile_source: ProfileSourceKind,

    /// Tweets fixture URL
    pub twitter_fixture_url: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum iterations for the lookup agent loop
    pub max_iterations: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if a required variable is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let timeout_secs: u64 = parse_or(&lookup, "LLM_TIMEOUT_SECS", 60)?;
        let llm = LlmConfig {
            api_key: required("API_KEY")?,
            endpoint: required("AZURE_ENDPOINT")?,
            deployment: required("MODEL_NAME")?,
            api_version: lookup("API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        };

        let profile_source = match lookup("PROFILE_SOURCE")
            .unwrap_or_else(|| "fixture".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "fixture" | "mock" => ProfileSourceKind::Fixture {
                url: lookup("LINKEDIN_FIXTURE_URL")
                    .unwrap_or_else(|| DEFAULT_LINKEDIN_FIXTURE_URL.to_string()),
            },
            "proxycurl" => ProfileSourceKind::Proxycurl {
                api_key: required("PROXYCURL_API_KEY")?,
            },
            other => {
                return Err(ConfigError::InvalidValue(
                    "PROFILE_SOURCE".to_string(),
                    format!("expected 'fixture' or 'proxycurl', got: {}", other),
                ))
            }
        };

        let max_iterations: usize = parse_or(&lookup, "MAX_ITERATIONS", 10)?;
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_ITERATIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            llm,
            tavily_api_key: lookup("TAVILY_API_KEY").filter(|v| !v.trim().is_empty()),
            profile_source,
            twitter_fixture_url: lookup("TWITTER_FIXTURE_URL")
                .unwrap_or_else(|| DEFAULT_TWITTER_FIXTURE_URL.to_string()),
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 5000)?,
            max_iterations,
        })
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e))),
        None => Ok(default),
    }
}
