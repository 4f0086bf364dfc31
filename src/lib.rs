pub mod error;
pub mod config;
pub mod category;
pub mod meta;
pub mod template;
pub mod providers;
pub mod request;
pub mod transport;
pub mod session;
pub mod client;

/*

promptdesk is the client side of a prompt editor: it turns a category,
a mode, free-text input and an optional structured meta-prompt into one
request for a proxy backend that fronts hosted and local LLMs.

promptdesk/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports, channel API types, logging init
│   ├── error.rs        # Error enum
│   ├── config.rs       # Backend URLs, timeouts, caps, env loading
│   ├── category.rs     # The six prompt categories and their modes
│   ├── meta.rs         # Meta-prompt draft, preview, system prompt
│   ├── template.rs     # Template catalog keyed by category:mode:id
│   ├── providers/      # Provider enum, model decoding, local status
│   │   ├── mod.rs
│   │   └── ollama.rs   # Status types, health check, StatusPoller
│   ├── request.rs      # PromptRequest/PromptResponse, builder
│   ├── transport.rs    # POST to /api/prompt or /api/ollama/generate
│   ├── session.rs      # PromptEditor form state, stale-response guard
│   └── client.rs       # PromptBackend task (hand/foot channels)
└── tests/

*/

pub use category::PromptCategory;
pub use client::PromptBackend;
pub use config::ClientConfig;
pub use error::Error;
pub use meta::MetaPromptConfig;
pub use providers::{decode_model, ModelTarget, OllamaStatus, OllamaStatusData, Provider, StatusPoller};
pub use request::{build_request, validate_input, BuildParams, PromptRequest, PromptResponse, Usage};
pub use session::{PendingSubmission, PromptEditor};
pub use template::{PromptTemplate, TemplateContent, TemplateLibrary};
pub use transport::PromptTransport;

/// Initialise env_logger; `RUST_LOG` overrides the `info` default.
/// Safe to call more than once.
pub fn init_logging()
{   let _ = env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).try_init();
}

/// PROMPTDESK API INTERFACE:

// ===== SendPrompt =====

pub type SendPromptReply = request::PromptResponse;
pub type SendPromptReplySender
  = tokio::sync::mpsc::UnboundedSender<SendPromptReply>;

pub struct SendPromptArgs
{   pub request: request::PromptRequest
  , pub reply: SendPromptReplySender
}

// ===== CheckStatus =====

pub type CheckStatusReply = providers::OllamaStatusData;
pub type CheckStatusReplySender
  = tokio::sync::mpsc::UnboundedSender<CheckStatusReply>;

pub struct CheckStatusArgs
{   pub reply: CheckStatusReplySender
}

// ===== KillProcess =====

pub type KillProcessReply = Result<(), crate::error::Error>;
pub type KillProcessReplySender
  = tokio::sync::mpsc::UnboundedSender<KillProcessReply>;

pub struct KillProcessArgs
{   pub reply: KillProcessReplySender
}

// ===== PromptHand (sender side) =====

pub struct PromptHand
{   pub send_prompt_tx
      : tokio::sync::mpsc::UnboundedSender<SendPromptArgs>
  , pub check_status_tx
      : tokio::sync::mpsc::UnboundedSender<CheckStatusArgs>
  , pub kill_process_tx
      : tokio::sync::mpsc::UnboundedSender<KillProcessArgs>
}

// ===== PromptFoot (receiver side) =====

pub struct PromptFoot
{   pub send_prompt_rx
      : tokio::sync::mpsc::UnboundedReceiver<SendPromptArgs>
  , pub check_status_rx
      : tokio::sync::mpsc::UnboundedReceiver<CheckStatusArgs>
  , pub kill_process_rx
      : tokio::sync::mpsc::UnboundedReceiver<KillProcessArgs>
}
