use jsonschema::{Draft, Validator};
use serde_json::Value;

use crate::error::{AgentError, ValidationIssue};

/// Compiles a draft-07 schema, the dialect `schemars` emits.
pub fn compile_schema(name: &str, schema: &Value) -> Result<Validator, AgentError> {
    jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(schema)
        .map_err(|err| AgentError::Schema(format!("{}: invalid schema: {}", name, err)))
}

/// Every way `value` fails `validator`; empty when it conforms.
pub fn collect_issues(validator: &Validator, value: &Value) -> Vec<ValidationIssue> {
    validator
        .iter_errors(value)
        .map(|err| ValidationIssue::new(&err.instance_path.to_string(), &err.to_string()))
        .collect()
}
