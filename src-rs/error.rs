use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::ProviderError;

/// One failed constraint, located by a JSON-pointer style path
/// (`""` is the root, `/answer` a top-level field).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: &str, message: &str) -> Self {
        Self {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        write!(f, "{}: {}", path, self.message)
    }
}

/// Model output did not conform to the declared result schema.
#[derive(Clone, Debug, Error)]
#[error("{} validation error(s) for {schema}: {}", .issues.len(), render_issues(.issues))]
pub struct SchemaValidationError {
    pub schema: String,
    pub issues: Vec<ValidationIssue>,
}

impl SchemaValidationError {
    pub fn new(schema: &str, issues: Vec<ValidationIssue>) -> Self {
        Self {
            schema: schema.to_string(),
            issues,
        }
    }
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("unknown model: {0:?}")]
    UnknownModel(String),

    #[error("model request failed: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Validation(#[from] SchemaValidationError),

    #[error("tool error: {0}")]
    Tool(String),

    #[error("max iterations reached ({0})")]
    MaxIterations(usize),

    #[error("invalid output schema: {0}")]
    Schema(String),
}
