use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object. `None` accepts any arguments.
    pub parameters: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: Option<Value>,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(output: Value) -> Self {
        Self {
            success: true,
            output: Some(output),
            error: None,
        }
    }

    pub fn failed(error: &str) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.to_string()),
        }
    }
}

pub type ToolHandler = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

pub struct ToolEntry {
    pub handler: ToolHandler,
    pub schema: ToolSchema,
    /// `parameters`, compiled at registration.
    pub validator: Option<Validator>,
}
