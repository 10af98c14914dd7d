use std::fmt;
use std::sync::Arc;

use jsonschema::Validator;
use log::warn;
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::generate::TestDataGenerator;
use super::validate::{collect_issues, compile_schema};
use crate::error::{AgentError, SchemaValidationError, ValidationIssue};

/// Name of the tool a model calls to hand back a structured result.
pub const RESULT_TOOL_NAME: &str = "final_result";

/// A named JSON Schema describing the record an agent must return,
/// compiled once when it is built.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "SchemaDef", into = "SchemaDef")]
pub struct OutputSchema {
    name: String,
    json: Value,
    validator: Arc<Validator>,
}

#[derive(Clone, Serialize, Deserialize)]
struct SchemaDef {
    name: String,
    json: Value,
}

impl TryFrom<SchemaDef> for OutputSchema {
    type Error = AgentError;

    fn try_from(def: SchemaDef) -> Result<Self, Self::Error> {
        Self::from_json(&def.name, def.json)
    }
}

impl From<OutputSchema> for SchemaDef {
    fn from(schema: OutputSchema) -> Self {
        Self {
            name: schema.name,
            json: schema.json,
        }
    }
}

impl fmt::Debug for OutputSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSchema")
            .field("name", &self.name)
            .field("json", &self.json)
            .finish()
    }
}

impl PartialEq for OutputSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.json == other.json
    }
}

impl OutputSchema {
    pub fn for_type<T: JsonSchema>() -> Result<Self, AgentError> {
        let root = schema_for!(T);
        let json = serde_json::to_value(&root).map_err(|err| AgentError::Schema(err.to_string()))?;
        Self::from_json(&T::schema_name(), json)
    }

    /// Wraps a raw schema. The root must describe a JSON object, since the
    /// result is delivered as tool-call arguments.
    pub fn from_json(name: &str, json: Value) -> Result<Self, AgentError> {
        let obj = json
            .as_object()
            .ok_or_else(|| AgentError::Schema(format!("{}: schema must be a JSON object", name)))?;
        let is_object = match obj.get("type") {
            Some(Value::String(kind)) => kind == "object",
            Some(_) => false,
            None => obj.contains_key("properties"),
        };
        if !is_object {
            return Err(AgentError::Schema(format!("{}: result schema must describe an object", name)));
        }
        let validator = compile_schema(name, &json)?;
        Ok(Self {
            name: name.to_string(),
            json,
            validator: Arc::new(validator),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn tool_name(&self) -> &str {
        RESULT_TOOL_NAME
    }

    pub fn generate(&self, seed: u64) -> Value {
        TestDataGenerator::new(&self.json, seed).generate()
    }

    pub fn validate(&self, value: &Value) -> Result<(), SchemaValidationError> {
        let issues = collect_issues(&self.validator, value);
        if issues.is_empty() {
            return Ok(());
        }
        let err = SchemaValidationError::new(&self.name, issues);
        warn!("{}", err);
        Err(err)
    }

    /// Reads the first JSON object out of free text and validates it.
    /// Anything after that object is ignored.
    pub fn parse_text(&self, text: &str) -> Result<Value, SchemaValidationError> {
        let start = text
            .find('{')
            .ok_or_else(|| self.root_issue("output contains no JSON object"))?;
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        let value = match stream.next() {
            Some(Ok(value)) => value,
            Some(Err(err)) => return Err(self.root_issue(&format!("invalid JSON: {}", err))),
            None => return Err(self.root_issue("output contains no JSON object")),
        };
        self.validate(&value)?;
        Ok(value)
    }

    /// Converts an already validated value into the declared record type.
    pub fn to_typed<T: DeserializeOwned>(&self, value: Value) -> Result<T, SchemaValidationError> {
        serde_json::from_value(value).map_err(|err| self.root_issue(&err.to_string()))
    }

    fn root_issue(&self, message: &str) -> SchemaValidationError {
        SchemaValidationError::new(&self.name, vec![ValidationIssue::new("", message)])
    }
}
