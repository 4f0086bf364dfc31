//! Configuration for the prompt backend client and status polling

use serde::{Deserialize, Serialize};
use log::{debug, warn};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MAX_INPUT_CHARS: usize = 1000;

const ENV_API_BASE_URL: &str = "PROMPTDESK_API_BASE_URL";
const ENV_OLLAMA_BASE_URL: &str = "PROMPTDESK_OLLAMA_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "PROMPTDESK_TIMEOUT_SECS";
const ENV_POLL_INTERVAL_SECS: &str = "PROMPTDESK_POLL_INTERVAL_SECS";
const ENV_MAX_INPUT_CHARS: &str = "PROMPTDESK_MAX_INPUT_CHARS";

/// Sampling defaults attached to every built request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationDefaults
{   /// Temperature for sampling
    pub temperature: Option<f32>
  , /// Max tokens to generate
    pub max_tokens: Option<u32>
}

impl Default for GenerationDefaults
{   fn default() -> Self
    {   GenerationDefaults
        {   temperature: Some(0.7)
          , max_tokens: Some(1000)
        }
    }
}

/// promptdesk client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig
{   /// Base URL of the proxy backend serving `/api/...`
    pub api_base_url: String
  , /// Base URL of the local model runtime (display only)
    pub ollama_base_url: String
  , /// Request timeout in seconds
    pub timeout_secs: u64
  , /// Status polling cadence in seconds
    pub poll_interval_secs: u64
  , /// Character cap applied to prompt input
    pub max_input_chars: usize
  , /// Sampling defaults
    #[serde(default)]
    pub generation: GenerationDefaults
}

impl Default for ClientConfig
{   fn default() -> Self
    {   ClientConfig
        {   api_base_url: DEFAULT_API_BASE_URL.to_string()
          , ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string()
          , timeout_secs: 60
          , poll_interval_secs: 30
          , max_input_chars: DEFAULT_MAX_INPUT_CHARS
          , generation: GenerationDefaults::default()
        }
    }
}

impl ClientConfig
{   /// Build a config pointing at a specific backend
    pub fn with_api_base_url(base: impl Into<String>) -> Self
    {   ClientConfig
        {   api_base_url: base.into()
          , ..ClientConfig::default()
        }
    }

    /// Read configuration from the environment (and `.env`, if present)
    pub fn from_env() -> Result<Self, crate::error::Error>
    {   if dotenv::dotenv().is_err()
        {   debug!("No .env file loaded");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F)
      -> Result<Self, crate::error::Error>
    where F: Fn(&str) -> Option<String>
    {   let mut config = ClientConfig::default();

        if let Some(base) = lookup(ENV_API_BASE_URL)
        {   config.api_base_url = base;
        }
        if let Some(base) = lookup(ENV_OLLAMA_BASE_URL)
        {   config.ollama_base_url = base;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS)
        {   config.timeout_secs = parse_number(ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_POLL_INTERVAL_SECS)
        {   config.poll_interval_secs
              = parse_number(ENV_POLL_INTERVAL_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_INPUT_CHARS)
        {   config.max_input_chars
              = parse_number(ENV_MAX_INPUT_CHARS, &raw)?;
        }

        config.validate()?;
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    /// Reject values that would break the transport or poller
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   if self.api_base_url.trim().is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "api_base_url is empty".to_string()
            ));
        }
        if self.poll_interval_secs == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "poll_interval_secs must be positive".to_string()
            ));
        }
        if self.max_input_chars == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "max_input_chars must be positive".to_string()
            ));
        }
        Ok(())
    }

    /// Base URL with any trailing slash removed
    pub fn api_base(&self) -> &str
    {   self.api_base_url.trim_end_matches('/')
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str)
  -> Result<T, crate::error::Error>
{   raw.trim().parse::<T>().map_err(|_| {
      warn!("Ignoring malformed {}: {}", key, raw);
      crate::error::Error::InvalidConfiguration(
        format!("{} is not a number: {}", key, raw)
      )
    })
}
