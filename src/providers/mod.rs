//! Backend providers and model identifier decoding

pub mod ollama;

use std::fmt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use log::{debug, warn};

// Re-export for convenience
pub use ollama::{OllamaStatus, OllamaStatusData, StatusPoller};

/// Marker prefixing identifiers of models served by the local Ollama runtime
pub const OLLAMA_MODEL_PREFIX: &str = "ollama:";
/// Marker prefixing identifiers of models served by LM Studio
pub const LMSTUDIO_MODEL_PREFIX: &str = "lmstudio:";

/// Backend LLM vendor or runtime targeted by a request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Provider
{   /// OpenAI (GPT-4, etc.)
    OpenAI
  , /// Anthropic (Claude models)
    Anthropic
  , /// Google (Gemini)
    Google
  , /// Local Ollama runtime
    Ollama
  , /// Local LM Studio server
    LmStudio
  , /// Identifier that matched nothing, passed through verbatim
    Unrecognized(String)
}

impl Provider
{   pub fn as_str(&self) -> &str
    {   match self
        {   Provider::OpenAI => "openai"
          , Provider::Anthropic => "anthropic"
          , Provider::Google => "google"
          , Provider::Ollama => "ollama"
          , Provider::LmStudio => "lmstudio"
          , Provider::Unrecognized(raw) => raw.as_str()
        }
    }

    /// Whether requests go to the local generate endpoint
    pub fn is_ollama(&self) -> bool
    {   matches!(self, Provider::Ollama)
    }
}

impl From<&str> for Provider
{   fn from(s: &str) -> Self
    {   match s
        {   "openai" => Provider::OpenAI
          , "anthropic" => Provider::Anthropic
          , "google" => Provider::Google
          , "ollama" => Provider::Ollama
          , "lmstudio" => Provider::LmStudio
          , other => Provider::Unrecognized(other.to_string())
        }
    }
}

impl fmt::Display for Provider
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.as_str())
    }
}

impl Serialize for Provider
{   fn serialize<S: Serializer>(&self, serializer: S)
      -> Result<S::Ok, S::Error>
    {   serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provider
{   fn deserialize<D: Deserializer<'de>>(deserializer: D)
      -> Result<Self, D::Error>
    {   let raw = String::deserialize(deserializer)?;
        Ok(Provider::from(raw.as_str()))
    }
}

/// Decoded (provider, model) pair for a selectable model identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTarget
{   pub provider: Provider
  , pub model: String
  , /// Set when the identifier matched neither a prefix nor the table
    pub fallback: bool
}

impl ModelTarget
{   pub fn is_fallback(&self) -> bool
    {   self.fallback
    }
}

/// A hosted model offered in the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownModel
{   pub id: &'static str
  , pub label: &'static str
  , pub model: &'static str
}

/// Static table of hosted model identifiers
pub const KNOWN_MODELS: &[KnownModel] = &[
  KnownModel { id: "gemini", label: "Gemini Pro", model: "gemini-pro" }
, KnownModel { id: "gpt4", label: "GPT-4", model: "gpt-4" }
, KnownModel
  {   id: "claude"
    , label: "Claude 3 Opus"
    , model: "claude-3-opus-20240229"
  }
];

fn known_provider(id: &str) -> Option<Provider>
{   match id
    {   "gemini" => Some(Provider::Google)
      , "gpt4" => Some(Provider::OpenAI)
      , "claude" => Some(Provider::Anthropic)
      , _ => None
    }
}

fn decode_known(identifier: &str) -> Option<ModelTarget>
{   if let Some(model) = identifier.strip_prefix(OLLAMA_MODEL_PREFIX)
    {   return Some(ModelTarget
        {   provider: Provider::Ollama
          , model: model.to_string()
          , fallback: false
        });
    }
    if let Some(model) = identifier.strip_prefix(LMSTUDIO_MODEL_PREFIX)
    {   return Some(ModelTarget
        {   provider: Provider::LmStudio
          , model: model.to_string()
          , fallback: false
        });
    }
    let provider = known_provider(identifier)?;
    KNOWN_MODELS
      .iter()
      .find(|m| m.id == identifier)
      .map(|m| ModelTarget
        {   provider
          , model: m.model.to_string()
          , fallback: false
        })
}

/// Decode a selector identifier into (provider, model).
///
/// Unknown identifiers are passed through as both provider and model;
/// check [`ModelTarget::is_fallback`] or use [`decode_model_strict`].
pub fn decode_model(identifier: &str) -> ModelTarget
{   match decode_known(identifier)
    {   Some(target) => {
          debug!(
            "Decoded model {} -> {}/{}",
            identifier, target.provider, target.model
          );
          target
        }
      , None => {
          warn!(
            "Unrecognized model identifier {}, passing through",
            identifier
          );
          // a bare provider name still routes as that provider
          ModelTarget
          {   provider: Provider::from(identifier)
            , model: identifier.to_string()
            , fallback: true
          }
        }
    }
}

/// Decode, rejecting identifiers that are not prefixed or in the table
pub fn decode_model_strict(identifier: &str)
  -> Result<ModelTarget, crate::error::Error>
{   decode_known(identifier).ok_or_else(|| {
      crate::error::Error::UnknownModel(identifier.to_string())
    })
}

/// Selector entries: hosted models first, then local models as `ollama:<name>`
pub fn selectable_models(local_models: &[String]) -> Vec<(String, String)>
{   let hosted = KNOWN_MODELS
      .iter()
      .map(|m| (m.id.to_string(), m.label.to_string()));
    let local = local_models
      .iter()
      .map(|name| (format!("{}{}", OLLAMA_MODEL_PREFIX, name), name.clone()));
    hosted.chain(local).collect()
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn hosted_identifiers_decode_to_table_entries()
    {   assert_eq!(decode_model("gemini"), ModelTarget
        {   provider: Provider::Google
          , model: "gemini-pro".to_string()
          , fallback: false
        });
        assert_eq!(decode_model("gpt4"), ModelTarget
        {   provider: Provider::OpenAI
          , model: "gpt-4".to_string()
          , fallback: false
        });
    }

    #[test]
    fn ollama_prefix_is_stripped()
    {   let target = decode_model("ollama:llama2");
        assert_eq!(target.provider, Provider::Ollama);
        assert_eq!(target.model, "llama2");
        assert!(!target.is_fallback());
    }

    #[test]
    fn ollama_prefix_keeps_tag_suffix()
    {   assert_eq!(decode_model("ollama:mistral:7b").model, "mistral:7b");
    }

    #[test]
    fn lmstudio_prefix_routes_to_lmstudio()
    {   let target = decode_model("lmstudio:phi-3");
        assert_eq!(target.provider, Provider::LmStudio);
        assert_eq!(target.model, "phi-3");
    }

    #[test]
    fn unknown_identifier_passes_through()
    {   let target = decode_model("mystery");
        assert!(target.is_fallback());
        assert_eq!(target.provider.as_str(), "mystery");
        assert_eq!(target.model, "mystery");
    }

    #[test]
    fn bare_provider_name_keeps_its_provider()
    {   let target = decode_model("ollama");
        assert!(target.is_fallback());
        assert_eq!(target.provider, Provider::Ollama);
        assert_eq!(target.model, "ollama");

        assert_eq!(decode_model("openai").provider, Provider::OpenAI);
        assert_eq!(decode_model("lmstudio").provider, Provider::LmStudio);
    }

    #[test]
    fn fallback_provider_survives_serde()
    {   for id in ["ollama", "google", "mystery"]
        {   let provider = decode_model(id).provider;
            let json = serde_json::to_string(&provider).unwrap();
            let back: Provider = serde_json::from_str(&json).unwrap();
            assert_eq!(back, provider);
        }
    }

    #[test]
    fn strict_decoding_rejects_unknown()
    {   assert_eq!(
          decode_model_strict("mystery"),
          Err(crate::error::Error::UnknownModel("mystery".to_string()))
        );
        assert!(decode_model_strict("gpt4").is_ok());
    }

    #[test]
    fn provider_serializes_as_plain_string()
    {   assert_eq!(
          serde_json::to_string(&Provider::Google).unwrap(),
          "\"google\""
        );
        assert_eq!(
          serde_json::to_string(&Provider::Unrecognized("x".into())).unwrap(),
          "\"x\""
        );
        let parsed: Provider = serde_json::from_str("\"ollama\"").unwrap();
        assert_eq!(parsed, Provider::Ollama);
    }

    #[test]
    fn selector_lists_local_models_with_prefix()
    {   let entries = selectable_models(&["llama2".to_string()]);
        assert_eq!(entries.len(), KNOWN_MODELS.len() + 1);
        assert_eq!(
          entries.last(),
          Some(&("ollama:llama2".to_string(), "llama2".to_string()))
        );
    }
}
