use std::fmt;

/// Custom error type for promptdesk operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Input is empty after trimming
    EmptyInput
  , /// Input exceeds the character cap
    InputTooLong { len: usize, cap: usize }
  , /// Model identifier is not in the known table
    UnknownModel(String)
  , /// Category id is not one of the six prompt categories
    UnknownCategory(String)
  , /// Template is not in the catalog
    TemplateNotFound(String)
  , /// HTTP request error
    HttpError(String)
  , /// Backend returned an error response
    ApiError(String)
  , /// Failed to parse backend response
    ParseError(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Timeout error
    Timeout
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::EmptyInput => {
              write!(f, "Input text is empty")
            }
          , Error::InputTooLong { len, cap } => {
              write!(f,
                "Input is {} characters, limit is {}",
                len, cap
              )
            }
          , Error::UnknownModel(model) => {
              write!(f, "Unknown model identifier: {}", model)
            }
          , Error::UnknownCategory(category) => {
              write!(f, "Unknown prompt category: {}", category)
            }
          , Error::TemplateNotFound(key) => {
              write!(f, "Template not found: {}", key)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError(msg) => {
              write!(f, "{}", msg)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   if e.is_timeout()
        {   Error::Timeout
        } else if e.is_decode()
        {   Error::ParseError(e.to_string())
        } else
        {   Error::HttpError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error
{   fn from(e: serde_json::Error) -> Self
    {   Error::ParseError(e.to_string())
    }
}
