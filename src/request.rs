//! Request and response types and the request builder

use serde::{Deserialize, Serialize};
use log::{debug, trace};

use crate::category::PromptCategory;
use crate::config::GenerationDefaults;
use crate::meta::MetaPromptConfig;
use crate::providers::{decode_model, Provider};

/// Normalized request understood by every backend route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest
{   /// Prompt category id (`expansion`, `compression`, ...)
    pub mode: PromptCategory
  , /// Provider to use
    pub provider: Provider
  , /// Canonical model name
    pub model: String
  , /// Raw user input
    pub input_text: String
  , /// Structured meta-prompt, only in structured mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_prompt: Option<MetaPromptConfig>
  , /// Temperature for sampling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>
  , /// Max tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>
}

/// Token accounting reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage
{   #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>
}

/// Result of one submission: generated text or an error message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResponse
{   #[serde(default)]
    pub content: String
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>
}

impl PromptResponse
{   pub fn success(content: impl Into<String>, usage: Option<Usage>) -> Self
    {   PromptResponse
        {   content: content.into()
          , usage
          , error: None
        }
    }

    pub fn failure(message: impl Into<String>) -> Self
    {   PromptResponse
        {   content: String::new()
          , usage: None
          , error: Some(message.into())
        }
    }

    pub fn is_error(&self) -> bool
    {   self.error.is_some()
    }

    pub fn into_result(self) -> Result<String, crate::error::Error>
    {   match self.error
        {   Some(msg) => Err(crate::error::Error::ApiError(msg))
          , None => Ok(self.content)
        }
    }
}

/// Error body returned by the backend on non-2xx status
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody
{   #[serde(default)]
    pub detail: Option<String>
}

/// Everything the builder reads from the current selections
#[derive(Debug, Clone)]
pub struct BuildParams<'a>
{   pub category: PromptCategory
  , pub mode: &'a str
  , pub input_text: &'a str
  , pub model_identifier: &'a str
  , pub use_structured: bool
  , pub meta_prompt: &'a MetaPromptConfig
  , pub generation: &'a GenerationDefaults
}

/// Check input against emptiness and the character cap
pub fn validate_input(text: &str, cap: usize)
  -> Result<(), crate::error::Error>
{   if text.trim().is_empty()
    {   return Err(crate::error::Error::EmptyInput);
    }
    let len = text.chars().count();
    if len > cap
    {   return Err(crate::error::Error::InputTooLong { len, cap });
    }
    Ok(())
}

/// Cut input down to at most `cap` characters
pub fn truncate_to_cap(text: &str, cap: usize) -> String
{   match text.char_indices().nth(cap)
    {   Some((byte_idx, _)) => {
          trace!("Truncating input at {} characters", cap);
          text[..byte_idx].to_string()
        }
      , None => text.to_string()
    }
}

/// Assemble a request from the current selections
pub fn build_request(params: &BuildParams<'_>)
  -> Result<PromptRequest, crate::error::Error>
{   if params.input_text.trim().is_empty()
    {   return Err(crate::error::Error::EmptyInput);
    }

    let target = decode_model(params.model_identifier);
    debug!(
      "Building {} request (mode {}) for {}/{}",
      params.category, params.mode, target.provider, target.model
    );

    let meta_prompt = if params.use_structured
    {   Some(params.meta_prompt.clone())
    } else
    {   None
    };

    Ok(PromptRequest
    {   mode: params.category
      , provider: target.provider
      , model: target.model
      , input_text: params.input_text.to_string()
      , meta_prompt
      , temperature: params.generation.temperature
      , max_tokens: params.generation.max_tokens
    })
}
