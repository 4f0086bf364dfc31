//! Editor session: the form state behind one prompt editor view

use log::{debug, warn};

use crate::category::{ModeInfo, PromptCategory};
use crate::config::ClientConfig;
use crate::meta::MetaPromptConfig;
use crate::request::{
  build_request, truncate_to_cap, validate_input, BuildParams, PromptRequest,
  PromptResponse,
};
use crate::template::{PromptTemplate, TemplateLibrary};
use crate::transport::PromptTransport;

pub const DEFAULT_MODEL: &str = "gemini";

/// A built request tagged with the sequence number it was issued under
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission
{   pub seq: u64
  , pub request: PromptRequest
}

/// Form state for category, mode, model, input and meta-prompt draft
#[derive(Debug, Clone)]
pub struct PromptEditor
{   library: TemplateLibrary
  , config: ClientConfig
  , category: PromptCategory
  , mode: String
  , model: String
  , input: String
  , use_structured: bool
  , meta_prompt: MetaPromptConfig
  , selected_template: Option<String>
  , templates: Vec<PromptTemplate>
  , latest_seq: u64
  , is_loading: bool
  , response: String
  , error: Option<String>
}

impl PromptEditor
{   pub fn new(library: TemplateLibrary, config: ClientConfig) -> Self
    {   PromptEditor
        {   library
          , config
          , category: PromptCategory::default()
          , mode: String::new()
          , model: DEFAULT_MODEL.to_string()
          , input: String::new()
          , use_structured: false
          , meta_prompt: MetaPromptConfig::default()
          , selected_template: None
          , templates: vec![]
          , latest_seq: 0
          , is_loading: false
          , response: String::new()
          , error: None
        }
    }

    // ===== Selections =====

    /// Switch category; the mode and template choice are cleared
    pub fn set_category(&mut self, category: PromptCategory)
    {   if self.category != category
        {   debug!("Category {} -> {}", self.category, category);
            self.category = category;
            self.mode.clear();
            self.selected_template = None;
            self.refresh_templates();
        }
    }

    pub fn set_mode(&mut self, mode: &str)
    {   if self.category.find_mode(mode).is_none()
        {   warn!("Mode {} is not offered by {}", mode, self.category);
        }
        self.mode = mode.to_string();
        self.selected_template = None;
        self.refresh_templates();
    }

    pub fn set_model(&mut self, model_identifier: &str)
    {   self.model = model_identifier.to_string();
    }

    /// Replace the input, truncated to the configured cap
    pub fn set_input(&mut self, text: &str)
    {   self.input = truncate_to_cap(text, self.config.max_input_chars);
    }

    pub fn set_use_structured(&mut self, on: bool)
    {   self.use_structured = on;
    }

    pub fn set_purpose(&mut self, purpose: &str)
    {   self.meta_prompt.purpose = purpose.to_string();
    }

    pub fn set_instructions_text(&mut self, text: &str)
    {   self.meta_prompt.set_instructions_text(text);
    }

    pub fn set_sections_text(&mut self, text: &str)
    {   self.meta_prompt.set_sections_text(text);
    }

    pub fn set_variables_text(&mut self, text: &str)
    {   self.meta_prompt.set_variables_text(text);
    }

    /// Load a template for the current (category, mode) into the draft
    pub fn load_template(&mut self, id: &str)
      -> Result<(), crate::error::Error>
    {   let template = self.library
          .lookup(self.category, &self.mode, id)
          .ok_or_else(|| crate::error::Error::TemplateNotFound(
            crate::template::template_key(self.category, &self.mode, id)
          ))?;
        debug!("Loading template {}", template.key());
        self.meta_prompt = MetaPromptConfig::from(&template.content);
        self.selected_template = Some(id.to_string());
        self.use_structured = true;
        Ok(())
    }

    fn refresh_templates(&mut self)
    {   self.templates = if self.mode.is_empty()
        {   vec![]
        } else
        {   self.library
              .list_by_category_and_mode(self.category, &self.mode)
              .into_iter()
              .cloned()
              .collect()
        };
    }

    // ===== Accessors =====

    pub fn category(&self) -> PromptCategory
    {   self.category
    }

    pub fn mode(&self) -> &str
    {   &self.mode
    }

    pub fn mode_info(&self) -> Option<&'static ModeInfo>
    {   self.category.find_mode(&self.mode)
    }

    pub fn model(&self) -> &str
    {   &self.model
    }

    pub fn input(&self) -> &str
    {   &self.input
    }

    pub fn use_structured(&self) -> bool
    {   self.use_structured
    }

    pub fn meta_prompt(&self) -> &MetaPromptConfig
    {   &self.meta_prompt
    }

    pub fn selected_template(&self) -> Option<&str>
    {   self.selected_template.as_deref()
    }

    /// Templates available for the current (category, mode)
    pub fn templates(&self) -> &[PromptTemplate]
    {   &self.templates
    }

    /// Add a template to the catalog behind this editor
    pub fn add_template(&mut self, template: PromptTemplate)
    {   self.library.add(template);
        self.refresh_templates();
    }

    pub fn is_loading(&self) -> bool
    {   self.is_loading
    }

    pub fn response(&self) -> &str
    {   &self.response
    }

    pub fn error(&self) -> Option<&str>
    {   self.error.as_deref()
    }

    pub fn preview(&self) -> String
    {   self.meta_prompt.preview()
    }

    /// Hint for the input box
    pub fn input_hint(&self) -> String
    {   if self.use_structured
        {   self.meta_prompt.input_hint()
        } else
        {   format!(
              "Enter your input for {}...",
              self.category.name().to_lowercase()
            )
        }
    }

    // ===== Submission =====

    pub fn can_submit(&self) -> bool
    {   !self.is_loading
          && validate_input(&self.input, self.config.max_input_chars).is_ok()
    }

    /// Validate, build and tag a request; clears previous output
    pub fn begin_submit(&mut self)
      -> Result<PendingSubmission, crate::error::Error>
    {   validate_input(&self.input, self.config.max_input_chars)?;

        let request = build_request(&BuildParams
        {   category: self.category
          , mode: &self.mode
          , input_text: &self.input
          , model_identifier: &self.model
          , use_structured: self.use_structured
          , meta_prompt: &self.meta_prompt
          , generation: &self.config.generation
        })?;

        self.latest_seq += 1;
        self.is_loading = true;
        self.error = None;
        self.response.clear();
        debug!("Issued submission #{}", self.latest_seq);

        Ok(PendingSubmission
        {   seq: self.latest_seq
          , request
        })
    }

    /// Apply a response; returns false when a newer submission superseded it
    pub fn complete(&mut self, seq: u64, response: PromptResponse) -> bool
    {   if seq != self.latest_seq
        {   debug!(
              "Discarding stale response #{} (latest #{})",
              seq, self.latest_seq
            );
            return false;
        }
        self.is_loading = false;
        match response.error
        {   Some(msg) => {
              self.error = Some(msg);
            }
          , None => {
              self.response = response.content;
            }
        }
        true
    }

    /// Build, send and apply in one step
    pub async fn submit(&mut self, transport: &PromptTransport)
      -> Result<(), crate::error::Error>
    {   let pending = self.begin_submit()?;
        let response = transport.send(&pending.request).await;
        self.complete(pending.seq, response);
        Ok(())
    }
}
