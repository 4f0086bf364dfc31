use std::time::Duration;
use tokio::sync::mpsc;
use log::{debug, error, info};

use crate::config::ClientConfig;
use crate::providers::ollama::check_status;
use crate::request::PromptRequest;
use crate::transport::PromptTransport;
use crate::PromptFoot;

/// Public API for the prompt backend - owns the task
pub struct PromptBackend
{   hand: crate::PromptHand
  , _task_handle: tokio::task::JoinHandle<()>
}

impl PromptBackend
{   /// Create and spawn a new backend
    /// Returns immediately - spawns background task
    pub fn new(config: ClientConfig)
      -> Result<Self, crate::error::Error>
    {   debug!("Creating PromptBackend with task ownership");
        config.validate()?;
        let transport = PromptTransport::new(&config)?;
        let status_client = reqwest::Client::builder()
          .timeout(Duration::from_secs(config.timeout_secs))
          .build()
          .map_err(|e| {
            error!("Failed to build status client: {}", e);
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;

        let (send_prompt_tx, send_prompt_rx)
          = mpsc::unbounded_channel();
        let (check_status_tx, check_status_rx)
          = mpsc::unbounded_channel();
        let (kill_process_tx, kill_process_rx)
          = mpsc::unbounded_channel();

        let hand = crate::PromptHand
        {   send_prompt_tx
          , check_status_tx
          , kill_process_tx
        };

        let foot = crate::PromptFoot
        {   send_prompt_rx
          , check_status_rx
          , kill_process_rx
        };

        let api_base = config.api_base().to_string();
        let _task_handle = tokio::spawn(async move {
          run_backend_loop(foot, transport, status_client, api_base).await
        });

        Ok(PromptBackend
        {   hand
          , _task_handle
        })
    }

    /// Send a prompt - returns almost immediately
    pub async fn send_prompt(
      &self
    , request: PromptRequest
    ) -> Result<
        mpsc::UnboundedReceiver<crate::SendPromptReply>,
        crate::error::Error
      >
    {   debug!("send_prompt queuing command for model: {}", request.model);
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::SendPromptArgs
        {   request
          , reply: reply_tx
        };

        self.hand.send_prompt_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::Other(
              "Backend disconnected".to_string()
            )
          })?;

        Ok(reply_rx)
    }

    /// One-off local model status check - returns almost immediately
    pub async fn check_status(
      &self
    ) -> Result<
        mpsc::UnboundedReceiver<crate::CheckStatusReply>,
        crate::error::Error
      >
    {   debug!("check_status queuing command");
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::CheckStatusArgs
        {   reply: reply_tx
        };

        self.hand.check_status_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::Other(
              "Backend disconnected".to_string()
            )
          })?;

        Ok(reply_rx)
    }

    /// Gracefully shutdown the backend
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down PromptBackend");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::KillProcessArgs
        {   reply: reply_tx
        };

        self.hand.kill_process_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel already closed");
            crate::error::Error::Other(
              "Backend already shutdown".to_string()
            )
          })?;

        // Wait for shutdown confirmation
        if let Some(result) = reply_rx.recv().await
        {   debug!("Backend shutdown confirmed");
            result
        } else
        {   error!("Backend shutdown timeout");
            Err(crate::error::Error::Timeout)
        }
    }
}

/// Main backend event loop
///
/// tokio::select! only queues: each arm spawns the request
/// and goes back to listening.
async fn run_backend_loop(
  foot: PromptFoot
, transport: PromptTransport
, status_client: reqwest::Client
, api_base: String
)
{   debug!("Starting PromptBackend event loop");
    let PromptFoot
    {   mut send_prompt_rx
      , mut check_status_rx
      , mut kill_process_rx
    } = foot;

    loop
    { tokio::select!
      { Some(cmd) = send_prompt_rx.recv() => {
          debug!("Received SendPrompt for {}", cmd.request.provider);
          let transport = transport.clone();
          tokio::spawn(async move {
            let response = transport.send(&cmd.request).await;
            let _ = cmd.reply.send(response);
          });
        }
      , Some(cmd) = check_status_rx.recv() => {
          debug!("Received CheckStatus");
          let http_client = status_client.clone();
          let api_base = api_base.clone();
          tokio::spawn(async move {
            let data = check_status(&http_client, &api_base).await;
            let _ = cmd.reply.send(data);
          });
        }
      , Some(cmd) = kill_process_rx.recv() => {
          debug!("Received KillProcess");
          let _ = cmd.reply.send(Ok(()));
          info!("PromptBackend shutting down");
          break;
        }
      , else => {
          debug!("All command channels closed");
          break;
        }
      }
    }
}
