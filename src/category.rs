//! Prompt categories and the modes offered inside each

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Top-level classification of prompt intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptCategory
{   /// Small input -> large output
    Expansion
  , /// Large input -> small output
    Compression
  , /// Input format -> different output format
    Conversion
  , /// Query -> relevant information
    Seeker
  , /// Command -> execution result
    Action
  , /// Complex input -> judgment, insight or decision
    Reasoning
}

/// A mode offered inside a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeInfo
{   pub id: &'static str
  , pub name: &'static str
  , pub description: &'static str
}

const fn mode(
  id: &'static str
, name: &'static str
, description: &'static str
) -> ModeInfo
{   ModeInfo { id, name, description }
}

const EXPANSION_MODES: &[ModeInfo] = &[
  mode("content", "Content Generation", "Create detailed content")
, mode("explanation", "Explanation", "Generate explanations")
, mode("learning", "Learning", "Create educational content")
, mode("ideation", "Ideation", "Generate ideas")
, mode("story", "Story Writing", "Create stories")
];

const COMPRESSION_MODES: &[ModeInfo] = &[
  mode("summary", "Text Summarization", "Create summaries")
, mode("key-points", "Key Points", "Extract main points")
, mode("abstract", "Abstract Generation", "Generate abstracts")
];

const CONVERSION_MODES: &[ModeInfo] = &[
  mode("text-to-code", "Text to Code", "Convert to code")
, mode("text-to-sql", "Text to SQL", "Convert to SQL")
, mode("format", "Format Conversion", "Convert formats")
];

const SEEKER_MODES: &[ModeInfo] = &[
  mode("qa", "Question Answering", "Get answers")
, mode("extraction", "Information Extraction", "Extract info")
, mode("search", "Document Search", "Search documents")
];

const ACTION_MODES: &[ModeInfo] = &[
  mode("automation", "Task Automation", "Automate tasks")
, mode("command", "Command Execution", "Run commands")
, mode("workflow", "Workflow Management", "Manage workflows")
];

const REASONING_MODES: &[ModeInfo] = &[
  mode("decision", "Decision Making", "Make decisions")
, mode("planning", "Planning", "Create plans")
, mode("problem", "Problem Solving", "Solve problems")
];

impl PromptCategory
{   pub const ALL: [PromptCategory; 6] = [
      PromptCategory::Expansion
    , PromptCategory::Compression
    , PromptCategory::Conversion
    , PromptCategory::Seeker
    , PromptCategory::Action
    , PromptCategory::Reasoning
    ];

    /// Wire id, also used as the request `mode` field
    pub fn id(&self) -> &'static str
    {   match self
        {   PromptCategory::Expansion => "expansion"
          , PromptCategory::Compression => "compression"
          , PromptCategory::Conversion => "conversion"
          , PromptCategory::Seeker => "seeker"
          , PromptCategory::Action => "action"
          , PromptCategory::Reasoning => "reasoning"
        }
    }

    pub fn name(&self) -> &'static str
    {   match self
        {   PromptCategory::Expansion => "Expansion Prompts"
          , PromptCategory::Compression => "Compression Prompts"
          , PromptCategory::Conversion => "Conversion Prompts"
          , PromptCategory::Seeker => "Seeker Prompts"
          , PromptCategory::Action => "Action Prompts"
          , PromptCategory::Reasoning => "Reasoning Prompts"
        }
    }

    pub fn short_description(&self) -> &'static str
    {   match self
        {   PromptCategory::Expansion => "Small input -> Large output."
          , PromptCategory::Compression => "Large input -> Small output."
          , PromptCategory::Conversion
              => "Input format -> Different output format."
          , PromptCategory::Seeker => "Query -> Relevant information."
          , PromptCategory::Action => "Command -> Execution result."
          , PromptCategory::Reasoning
              => "Complex input -> Judgment/Insight/Decision."
        }
    }

    pub fn description(&self) -> &'static str
    {   match self
        {   PromptCategory::Expansion
              => "Transform brief inputs into comprehensive content"
          , PromptCategory::Compression
              => "Distill and summarize information"
          , PromptCategory::Conversion
              => "Transform content while preserving meaning"
          , PromptCategory::Seeker
              => "Find and retrieve specific information"
          , PromptCategory::Action
              => "Execute commands and workflows"
          , PromptCategory::Reasoning
              => "Provide analysis and insights"
        }
    }

    /// Modes offered for this category, in display order
    pub fn modes(&self) -> &'static [ModeInfo]
    {   match self
        {   PromptCategory::Expansion => EXPANSION_MODES
          , PromptCategory::Compression => COMPRESSION_MODES
          , PromptCategory::Conversion => CONVERSION_MODES
          , PromptCategory::Seeker => SEEKER_MODES
          , PromptCategory::Action => ACTION_MODES
          , PromptCategory::Reasoning => REASONING_MODES
        }
    }

    pub fn find_mode(&self, mode_id: &str) -> Option<&'static ModeInfo>
    {   self.modes().iter().find(|m| m.id == mode_id)
    }
}

impl Default for PromptCategory
{   fn default() -> Self
    {   PromptCategory::Expansion
    }
}

impl fmt::Display for PromptCategory
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.id())
    }
}

impl FromStr for PromptCategory
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   PromptCategory::ALL
          .iter()
          .copied()
          .find(|c| c.id() == s)
          .ok_or_else(|| crate::error::Error::UnknownCategory(
            s.to_string()
          ))
    }
}
