//! HTTP transport to the prompt backend

use std::time::Duration;
use log::{debug, trace, error};

use crate::config::ClientConfig;
use crate::request::{ErrorBody, PromptRequest, PromptResponse, Usage};

const PROMPT_PATH: &str = "/api/prompt";
const OLLAMA_GENERATE_PATH: &str = "/api/ollama/generate";
const FALLBACK_ERROR: &str = "Failed to generate response";

#[derive(Debug, serde::Deserialize)]
struct SuccessBody
{   content: String
  , #[serde(default)]
    usage: Option<Usage>
}

/// Posts prompt requests to the backend
#[derive(Debug, Clone)]
pub struct PromptTransport
{   http_client: reqwest::Client
  , api_base: String
}

impl PromptTransport
{   pub fn new(config: &ClientConfig)
      -> Result<Self, crate::error::Error>
    {   debug!("Creating PromptTransport for {}", config.api_base());
        let http_client = reqwest::Client::builder()
          .timeout(Duration::from_secs(config.timeout_secs))
          .build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;
        Ok(PromptTransport
        {   http_client
          , api_base: config.api_base().to_string()
        })
    }

    /// Endpoint a request is routed to
    pub fn endpoint_for(&self, request: &PromptRequest) -> String
    {   let path = if request.provider.is_ollama()
        {   OLLAMA_GENERATE_PATH
        } else
        {   PROMPT_PATH
        };
        format!("{}{}", self.api_base, path)
    }

    /// Send a request. Failures come back in `PromptResponse::error`.
    pub async fn send(&self, request: &PromptRequest) -> PromptResponse
    {   match self.try_send(request).await
        {   Ok(response) => response
          , Err(e) => {
              error!("Prompt request failed: {}", e);
              PromptResponse::failure(e.to_string())
            }
        }
    }

    async fn try_send(&self, request: &PromptRequest)
      -> Result<PromptResponse, crate::error::Error>
    {   let url = self.endpoint_for(request);
        debug!("Sending {} request to {}", request.provider, url);
        trace!("Request payload: {:?}", request);

        let response = self.http_client
          .post(&url)
          .header("Content-Type", "application/json")
          .header("Accept", "application/json")
          .json(request)
          .send()
          .await?;

        let status = response.status();
        trace!("Response status: {}", status);

        if !status.is_success()
        {   let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
              .ok()
              .and_then(|b| b.detail)
              .unwrap_or_else(|| FALLBACK_ERROR.to_string());
            error!("Backend error {}: {}", status, detail);
            return Err(crate::error::Error::ApiError(detail));
        }

        let body = response.text().await?;
        let parsed: SuccessBody = serde_json::from_str(&body)?;
        debug!("Received {} characters", parsed.content.chars().count());
        Ok(PromptResponse::success(parsed.content, parsed.usage))
    }
}
