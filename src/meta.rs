//! Structured meta-prompt draft and its rendered forms

use serde::{Deserialize, Serialize};

/// Structured decomposition of a prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaPromptConfig
{   pub purpose: String
  , pub instructions: Vec<String>
  , #[serde(default)]
    pub sections: Vec<String>
  , #[serde(default)]
    pub variables: Vec<String>
}

impl MetaPromptConfig
{   pub fn new(
      purpose: impl Into<String>
    , instructions: Vec<String>
    ) -> Self
    {   MetaPromptConfig
        {   purpose: purpose.into()
          , instructions
          , sections: vec![]
          , variables: vec![]
        }
    }

    pub fn is_empty(&self) -> bool
    {   self.purpose.trim().is_empty()
          && self.instructions.is_empty()
          && self.sections.is_empty()
          && self.variables.is_empty()
    }

    /// Replace instructions from newline-separated text
    pub fn set_instructions_text(&mut self, text: &str)
    {   self.instructions = split_lines(text);
    }

    pub fn set_sections_text(&mut self, text: &str)
    {   self.sections = split_lines(text);
    }

    pub fn set_variables_text(&mut self, text: &str)
    {   self.variables = split_lines(text);
    }

    /// Tagged preview of the final prompt structure
    pub fn preview(&self) -> String
    {   let purpose = if self.purpose.is_empty()
        {   "..."
        } else
        {   self.purpose.as_str()
        };
        let instructions = if self.instructions.is_empty()
        {   "...".to_string()
        } else
        {   indent_lines(&self.instructions)
        };

        let mut out = format!(
          "<purpose>\n{}\n</purpose>\n\n<instructions>\n{}\n</instructions>\n\n",
          purpose, instructions
        );
        if !self.sections.is_empty()
        {   out.push_str(&format!(
              "<sections>\n{}\n</sections>\n\n",
              indent_lines(&self.sections)
            ));
        }
        if !self.variables.is_empty()
        {   out.push_str(&format!(
              "<variables>\n{}\n</variables>",
              indent_lines(&self.variables)
            ));
        }
        out
    }

    /// Plain-text system prompt as the backend composes it
    pub fn system_prompt(&self) -> String
    {   let mut parts = vec![
          format!("Purpose: {}", self.purpose)
        , "\nInstructions:".to_string()
        ];
        parts.extend(self.instructions.iter().map(|i| format!("- {}", i)));
        if !self.sections.is_empty()
        {   parts.push("\nRequired Sections:".to_string());
            parts.extend(self.sections.iter().map(|s| format!("- {}", s)));
        }
        parts.join("\n")
    }

    /// Hint shown over the input box when structured mode is on
    pub fn input_hint(&self) -> String
    {   if self.variables.is_empty()
        {   "Enter values for: no variables defined".to_string()
        } else
        {   format!("Enter values for: {}", self.variables.join(", "))
        }
    }
}

fn split_lines(text: &str) -> Vec<String>
{   text.split('\n')
      .filter(|line| !line.trim().is_empty())
      .map(|line| line.to_string())
      .collect()
}

fn indent_lines(lines: &[String]) -> String
{   lines.iter()
      .map(|l| format!("  {}", l))
      .collect::<Vec<_>>()
      .join("\n")
}
