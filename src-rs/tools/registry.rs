use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;

use super::types::{ToolEntry, ToolHandler, ToolResult, ToolSchema};
use crate::error::AgentError;
use crate::schema::{collect_issues, compile_schema, RESULT_TOOL_NAME};

/// Function tools offered to the model. Keyed by name, iterated in name order.
pub struct ToolRegistry {
    tools: RwLock<BTreeMap<String, ToolEntry>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn register(&self, name: &str, handler: ToolHandler, mut schema: ToolSchema) -> Result<(), AgentError> {
        if name.is_empty() {
            return Err(AgentError::Tool("tool name must not be empty".to_string()));
        }
        if name == RESULT_TOOL_NAME {
            return Err(AgentError::Tool(format!("{} is reserved for structured results", name)));
        }
        if schema.name.is_empty() {
            schema.name = name.to_string();
        }
        if schema.name != name {
            return Err(AgentError::Tool(format!(
                "schema name mismatch: {} != {}",
                schema.name, name
            )));
        }

        let validator = match &schema.parameters {
            Some(parameters) => Some(compile_schema(name, parameters)?),
            None => None,
        };

        let mut map = self
            .tools
            .write()
            .map_err(|_| AgentError::Tool("lock error".to_string()))?;
        if map.contains_key(name) {
            return Err(AgentError::Tool(format!("tool already registered: {}", name)));
        }
        map.insert(
            name.to_string(),
            ToolEntry {
                handler,
                schema,
                validator,
            },
        );
        Ok(())
    }

    /// Runs a tool. Arguments are checked against the tool's parameter
    /// schema first; the handler never sees arguments that fail it.
    pub fn execute(&self, name: &str, args: Value) -> ToolResult {
        let map = match self.tools.read() {
            Ok(lock) => lock,
            Err(_) => return ToolResult::failed("lock error"),
        };

        let entry = match map.get(name) {
            Some(entry) => entry,
            None => return ToolResult::failed(&format!("tool not found: {}", name)),
        };

        if let Some(validator) = &entry.validator {
            let issues = collect_issues(validator, &args);
            if !issues.is_empty() {
                let detail: Vec<String> = issues.iter().map(ToString::to_string).collect();
                return ToolResult::failed(&format!("invalid arguments: {}", detail.join("; ")));
            }
        }

        match (entry.handler)(args) {
            Ok(output) => ToolResult::ok(output),
            Err(err) => ToolResult::failed(&err),
        }
    }

    pub fn get_schemas(&self) -> Vec<ToolSchema> {
        let map = match self.tools.read() {
            Ok(lock) => lock,
            Err(_) => return vec![],
        };
        map.values().map(|entry| entry.schema.clone()).collect()
    }

    pub fn has(&self, name: &str) -> bool {
        let map = match self.tools.read() {
            Ok(lock) => lock,
            Err(_) => return false,
        };
        map.contains_key(name)
    }

    pub fn count(&self) -> usize {
        let map = match self.tools.read() {
            Ok(lock) => lock,
            Err(_) => return 0,
        };
        map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn add_schema() -> ToolSchema {
        ToolSchema {
            name: String::new(),
            description: "Add two integers".to_string(),
            parameters: Some(json!({
                "type": "object",
                "required": ["a", "b"],
                "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}}
            })),
        }
    }

    fn add_handler() -> ToolHandler {
        Arc::new(|args: Value| -> Result<Value, String> {
            let a = args["a"].as_i64().ok_or("a missing")?;
            let b = args["b"].as_i64().ok_or("b missing")?;
            Ok(json!(a + b))
        })
    }

    #[test]
    fn registers_and_executes() {
        let registry = ToolRegistry::new();
        registry.register("add", add_handler(), add_schema()).unwrap();

        assert!(registry.has("add"));
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.get_schemas()[0].name, "add");

        let result = registry.execute("add", json!({"a": 2, "b": 2}));
        assert!(result.success);
        assert_eq!(result.output, Some(json!(4)));
    }

    #[test]
    fn rejects_bad_registrations() {
        let registry = ToolRegistry::new();
        assert!(registry.register("", add_handler(), add_schema()).is_err());
        assert!(registry.register(RESULT_TOOL_NAME, add_handler(), add_schema()).is_err());

        let mut mismatched = add_schema();
        mismatched.name = "sum".to_string();
        assert!(registry.register("add", add_handler(), mismatched).is_err());

        registry.register("add", add_handler(), add_schema()).unwrap();
        let err = registry.register("add", add_handler(), add_schema()).unwrap_err();
        assert_eq!(err.to_string(), "tool error: tool already registered: add");
    }

    #[test]
    fn invalid_arguments_never_reach_handler() {
        let registry = ToolRegistry::new();
        registry.register("add", add_handler(), add_schema()).unwrap();

        let result = registry.execute("add", json!({"a": "two"}));
        assert!(!result.success);
        let error = result.error.unwrap_or_default();
        assert!(error.starts_with("invalid arguments: "));
        assert!(error.contains("\"b\" is a required property"));
        assert!(error.contains("/a: "));
        assert!(error.contains("integer"));

        let result = registry.execute("missing", json!({}));
        assert_eq!(result.error.as_deref(), Some("tool not found: missing"));
    }

    #[test]
    fn malformed_parameter_schema_rejected_at_registration() {
        let registry = ToolRegistry::new();
        let mut schema = add_schema();
        schema.parameters = Some(json!({"type": "object", "required": "a"}));

        match registry.register("add", add_handler(), schema) {
            Err(AgentError::Schema(msg)) => assert!(msg.starts_with("add: invalid schema")),
            other => panic!("expected schema error, got {:?}", other),
        }
        assert!(!registry.has("add"));
    }
}
