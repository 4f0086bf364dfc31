use std::time::Duration;
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, watch};
use tokio::time::MissedTickBehavior;
use log::{debug, trace, error, info};

use crate::config::ClientConfig;

const STATUS_PATH: &str = "/api/ollama/status";

// ===== Status Types =====

/// Availability of the local model runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OllamaStatus
{   Available
  , Unavailable
  , Loading
}

/// Snapshot reported by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaStatusData
{   pub status: OllamaStatus
  , #[serde(rename = "lastChecked")]
    pub last_checked: String
  , #[serde(default)]
    pub models: Vec<String>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>
}

fn now_stamp() -> String
{   chrono::Utc::now().to_rfc3339()
}

impl OllamaStatusData
{   /// State before the first check completes
    pub fn loading() -> Self
    {   OllamaStatusData
        {   status: OllamaStatus::Loading
          , last_checked: now_stamp()
          , models: vec![]
          , error: None
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self
    {   OllamaStatusData
        {   status: OllamaStatus::Unavailable
          , last_checked: now_stamp()
          , models: vec![]
          , error: Some(message.into())
        }
    }

    /// Models are only kept while the runtime is available
    pub fn normalized(mut self) -> Self
    {   if self.status != OllamaStatus::Available && !self.models.is_empty()
        {   debug!(
              "Dropping {} models reported with status {:?}",
              self.models.len(), self.status
            );
            self.models.clear();
        }
        self
    }

    pub fn is_available(&self) -> bool
    {   self.status == OllamaStatus::Available
    }
}

// ===== Health Check =====

async fn fetch_status(
  http_client: &reqwest::Client
, url: &str
) -> Result<OllamaStatusData, crate::error::Error>
{   let response = http_client.get(url).send().await?;

    let status = response.status();
    trace!("Status response: {}", status);

    if !status.is_success()
    {   return Err(crate::error::Error::ApiError(
          "Failed to fetch Ollama status".to_string()
        ));
    }

    let body = response.text().await?;
    let data: OllamaStatusData = serde_json::from_str(&body)?;
    Ok(data.normalized())
}

/// Check the status endpoint once; failures become `unavailable`
pub async fn check_status(
  http_client: &reqwest::Client
, api_base: &str
) -> OllamaStatusData
{   let url = format!("{}{}", api_base, STATUS_PATH);
    match fetch_status(http_client, &url).await
    {   Ok(data) => {
          debug!(
            "Ollama {:?} with {} models",
            data.status, data.models.len()
          );
          data
        }
      , Err(e) => {
          error!("Ollama status check failed: {}", e);
          OllamaStatusData::unavailable(e.to_string())
        }
    }
}

// ===== Status Poller =====

/// Background task polling the status endpoint at a fixed cadence.
/// Dropping the poller stops the task.
pub struct StatusPoller
{   state_rx: watch::Receiver<OllamaStatusData>
  , stop_tx: Option<oneshot::Sender<()>>
  , task: tokio::task::JoinHandle<()>
}

impl StatusPoller
{   /// Spawn the poller; the first check runs immediately
    pub fn start(config: &ClientConfig)
      -> Result<Self, crate::error::Error>
    {   let http_client = reqwest::Client::builder()
          .timeout(Duration::from_secs(config.timeout_secs))
          .build()
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;
        Ok(Self::start_with(
          http_client
        , config.api_base().to_string()
        , Duration::from_secs(config.poll_interval_secs)
        ))
    }

    pub fn start_with(
      http_client: reqwest::Client
    , api_base: String
    , period: Duration
    ) -> Self
    {   debug!("Starting status poller every {:?}", period);
        let (state_tx, state_rx)
          = watch::channel(OllamaStatusData::loading());
        let (stop_tx, stop_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
          run_poll_loop(http_client, api_base, period, state_tx, stop_rx)
            .await
        });

        StatusPoller
        {   state_rx
          , stop_tx: Some(stop_tx)
          , task
        }
    }

    /// Latest snapshot
    pub fn current(&self) -> OllamaStatusData
    {   self.state_rx.borrow().clone()
    }

    /// Receiver notified on every completed check
    pub fn subscribe(&self) -> watch::Receiver<OllamaStatusData>
    {   self.state_rx.clone()
    }

    pub fn is_running(&self) -> bool
    {   !self.task.is_finished()
    }

    /// Stop polling and wait for the task to exit
    pub async fn stop(mut self)
    {   debug!("Stopping status poller");
        if let Some(stop_tx) = self.stop_tx.take()
        {   let _ = stop_tx.send(());
        }
        if let Err(e) = (&mut self.task).await
        {   error!("Status poller task failed: {}", e);
        }
    }
}

async fn run_poll_loop(
  http_client: reqwest::Client
, api_base: String
, period: Duration
, state_tx: watch::Sender<OllamaStatusData>
, mut stop_rx: oneshot::Receiver<()>
)
{   let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop
    { tokio::select!
      { _ = &mut stop_rx => {
          info!("Status poller shutting down");
          break;
        }
      , _ = ticker.tick() => {
          // stop is honoured while a check is in flight
          tokio::select!
          { _ = &mut stop_rx => {
              info!("Status poller shutting down mid-check");
              break;
            }
          , data = check_status(&http_client, &api_base) => {
              state_tx.send_replace(data);
            }
          }
        }
      }
    }
}
