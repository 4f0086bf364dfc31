//! In-memory prompt template catalog

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use log::{debug, trace};

use crate::category::PromptCategory;
use crate::meta::MetaPromptConfig;

/// Structured body of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateContent
{   pub purpose: String
  , pub instructions: Vec<String>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<String>>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<String>>
}

/// A named template for one (category, mode)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate
{   pub id: String
  , pub name: String
  , pub category: PromptCategory
  , pub mode: String
  , pub content: TemplateContent
}

impl PromptTemplate
{   /// Composite key, `category:mode:id`
    pub fn key(&self) -> String
    {   template_key(self.category, &self.mode, &self.id)
    }
}

impl From<&TemplateContent> for MetaPromptConfig
{   fn from(content: &TemplateContent) -> Self
    {   MetaPromptConfig
        {   purpose: content.purpose.clone()
          , instructions: content.instructions.clone()
          , sections: content.sections.clone().unwrap_or_default()
          , variables: content.variables.clone().unwrap_or_default()
        }
    }
}

pub fn template_key(
  category: PromptCategory
, mode: &str
, id: &str
) -> String
{   format!("{}:{}:{}", category.id(), mode, id)
}

type CatalogKey = (PromptCategory, String, String);

/// Template catalog keyed by (category, mode, id)
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary
{   templates: BTreeMap<CatalogKey, PromptTemplate>
}

impl TemplateLibrary
{   /// Catalog pre-loaded with the built-in templates
    pub fn new() -> Self
    {   let mut library = TemplateLibrary::empty();
        for template in default_templates()
        {   library.add(template);
        }
        debug!("Loaded {} built-in templates", library.len());
        library
    }

    pub fn empty() -> Self
    {   TemplateLibrary { templates: BTreeMap::new() }
    }

    pub fn lookup(
      &self
    , category: PromptCategory
    , mode: &str
    , id: &str
    ) -> Option<&PromptTemplate>
    {   trace!("Template lookup {}", template_key(category, mode, id));
        self.templates.get(
          &(category, mode.to_string(), id.to_string())
        )
    }

    pub fn list_by_category(
      &self
    , category: PromptCategory
    ) -> Vec<&PromptTemplate>
    {   self.templates
          .values()
          .filter(|t| t.category == category)
          .collect()
    }

    pub fn list_by_category_and_mode(
      &self
    , category: PromptCategory
    , mode: &str
    ) -> Vec<&PromptTemplate>
    {   self.templates
          .values()
          .filter(|t| t.category == category && t.mode == mode)
          .collect()
    }

    /// Insert, replacing any template with the same key
    pub fn add(&mut self, template: PromptTemplate)
    {   let key = (
          template.category
        , template.mode.clone()
        , template.id.clone()
        );
        if self.templates.insert(key, template).is_some()
        {   debug!("Replaced existing template");
        }
    }

    pub fn len(&self) -> usize
    {   self.templates.len()
    }

    pub fn is_empty(&self) -> bool
    {   self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptTemplate>
    {   self.templates.values()
    }
}

fn strings(items: &[&str]) -> Vec<String>
{   items.iter().map(|s| s.to_string()).collect()
}

/// Templates shipped with the library
pub fn default_templates() -> Vec<PromptTemplate>
{   vec![
      PromptTemplate
      {   id: "content-generation".to_string()
        , name: "Content Generation".to_string()
        , category: PromptCategory::Expansion
        , mode: "content".to_string()
        , content: TemplateContent
          {   purpose: "Transform brief topic ideas into comprehensive, \
                well-structured content".to_string()
            , instructions: strings(&[
                "Create an engaging introduction that hooks the reader"
              , "Develop at least 3 main points or sections"
              , "Include relevant examples or case studies"
              , "Maintain a consistent tone and style"
              , "Add a compelling conclusion that ties everything together"
              , "Use transition sentences between sections"
              ])
            , sections: Some(strings(&[
                "introduction", "main_points", "examples", "conclusion"
              ]))
            , variables: Some(strings(&[
                "topic", "target_length", "tone"
              ]))
          }
      }
    , PromptTemplate
      {   id: "explanation".to_string()
        , name: "Explanation".to_string()
        , category: PromptCategory::Expansion
        , mode: "explanation".to_string()
        , content: TemplateContent
          {   purpose: "Convert complex concepts into clear, \
                accessible explanations".to_string()
            , instructions: strings(&[
                "Start with a simple, high-level overview"
              , "Break down complex terms into simpler components"
              , "Use analogies or metaphors to illustrate concepts"
              , "Progress from basic to advanced understanding"
              , "Include practical examples or applications"
              , "Address common misconceptions"
              ])
            , sections: Some(strings(&[
                "overview", "key_concepts", "analogies"
              , "examples", "common_questions"
              ]))
            , variables: Some(strings(&[
                "concept", "audience_expertise", "desired_depth"
              ]))
          }
      }
    ]
}
