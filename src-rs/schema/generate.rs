//! Deterministic sample data from a JSON Schema.
//!
//! The same schema and seed always produce the same value. Only required
//! object properties are filled in, so the result is the smallest value the
//! schema accepts.

use chrono::{Days, NaiveDate};
use serde_json::{json, Map, Value};

use super::resolve_ref;

const TOKEN_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_DEPTH: usize = 32;

pub struct TestDataGenerator<'a> {
    root: &'a Value,
    seed: u64,
}

impl<'a> TestDataGenerator<'a> {
    pub fn new(root: &'a Value, seed: u64) -> Self {
        Self { root, seed }
    }

    pub fn generate(&self) -> Value {
        self.gen_any(self.root, 0)
    }

    fn pick(&self, len: usize) -> usize {
        (self.seed % len as u64) as usize
    }

    fn gen_any(&self, schema: &Value, depth: usize) -> Value {
        if depth > MAX_DEPTH {
            return Value::Null;
        }
        let obj = match schema.as_object() {
            Some(obj) => obj,
            None => return Value::String(self.token()),
        };

        if let Some(value) = obj.get("const") {
            return value.clone();
        }
        for key in ["enum", "examples"] {
            if let Some(choices) = non_empty(obj.get(key)) {
                return choices[self.pick(choices.len())].clone();
            }
        }
        if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
            return match resolve_ref(self.root, reference) {
                Some(target) => self.gen_any(target, depth + 1),
                None => Value::Null,
            };
        }
        for key in ["anyOf", "oneOf"] {
            if let Some(branches) = non_empty(obj.get(key)) {
                return self.gen_any(&branches[self.pick(branches.len())], depth + 1);
            }
        }
        if let Some(branches) = non_empty(obj.get("allOf")) {
            return self.gen_any(&branches[0], depth + 1);
        }

        match obj.get("type") {
            Some(Value::String(kind)) => self.gen_typed(kind, obj, depth),
            Some(Value::Array(kinds)) if !kinds.is_empty() => {
                let kind = kinds[self.pick(kinds.len())].as_str().unwrap_or("string");
                self.gen_typed(kind, obj, depth)
            }
            _ if obj.contains_key("properties") => self.gen_object(obj, depth),
            _ => Value::String(self.token()),
        }
    }

    fn gen_typed(&self, kind: &str, obj: &Map<String, Value>, depth: usize) -> Value {
        match kind {
            "object" => self.gen_object(obj, depth),
            "array" => self.gen_array(obj, depth),
            "string" => Value::String(self.gen_string(obj)),
            "integer" => json!(self.gen_int(obj)),
            "number" => json!(self.gen_int(obj) as f64),
            "boolean" => Value::Bool(self.seed % 2 == 1),
            "null" => Value::Null,
            _ => Value::String(self.token()),
        }
    }

    fn gen_object(&self, obj: &Map<String, Value>, depth: usize) -> Value {
        let required: Vec<&str> = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        let mut data = Map::new();
        if let Some(properties) = obj.get("properties").and_then(Value::as_object) {
            for (key, property) in properties {
                if required.contains(&key.as_str()) {
                    data.insert(key.clone(), self.gen_any(property, depth + 1));
                }
            }
        }
        Value::Object(data)
    }

    fn gen_array(&self, obj: &Map<String, Value>, depth: usize) -> Value {
        if obj.get("maxItems").and_then(Value::as_u64) == Some(0) {
            return json!([]);
        }
        match obj.get("items") {
            Some(Value::Array(positional)) => positional
                .iter()
                .map(|item| self.gen_any(item, depth + 1))
                .collect(),
            Some(item) => {
                let count = obj.get("minItems").and_then(Value::as_u64).unwrap_or(0).max(1);
                (0..count).map(|_| self.gen_any(item, depth + 1)).collect()
            }
            None => json!([self.token()]),
        }
    }

    fn gen_string(&self, obj: &Map<String, Value>) -> String {
        if let Some(min) = obj.get("minLength").and_then(Value::as_u64).filter(|min| *min > 0) {
            return self.token().repeat(min as usize);
        }
        if obj.get("maxLength").and_then(Value::as_u64) == Some(0) {
            return String::new();
        }
        match obj.get("format").and_then(Value::as_str) {
            Some("date") => self.date().map(|d| d.to_string()).unwrap_or_else(|| self.token()),
            Some("date-time") => self
                .date()
                .map(|d| format!("{}T00:00:00Z", d))
                .unwrap_or_else(|| self.token()),
            _ => self.token(),
        }
    }

    fn gen_int(&self, obj: &Map<String, Value>) -> i64 {
        let mut value = i64::try_from(self.seed).unwrap_or(i64::MAX);
        if let Some(min) = obj.get("minimum").and_then(Value::as_f64) {
            if (value as f64) < min {
                value = min.ceil() as i64;
            }
        }
        if let Some(min) = obj.get("exclusiveMinimum").and_then(Value::as_f64) {
            if (value as f64) <= min {
                value = min.floor() as i64 + 1;
            }
        }
        if let Some(max) = obj.get("maximum").and_then(Value::as_f64) {
            if (value as f64) > max {
                value = max.floor() as i64;
            }
        }
        if let Some(max) = obj.get("exclusiveMaximum").and_then(Value::as_f64) {
            if (value as f64) >= max {
                value = max.ceil() as i64 - 1;
            }
        }
        value
    }

    fn date(&self) -> Option<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)?;
        start.checked_add_days(Days::new(self.seed))
    }

    /// Base-N spelling of the seed over `TOKEN_CHARS`; seed 0 is "a".
    fn token(&self) -> String {
        let n = TOKEN_CHARS.len() as u64;
        let mut out = String::new();
        let mut rem = self.seed / n;
        while rem > 0 {
            out.push(TOKEN_CHARS[((rem - 1) % n) as usize] as char);
            rem /= n;
        }
        out.push(TOKEN_CHARS[(self.seed % n) as usize] as char);
        out
    }
}

fn non_empty(value: Option<&Value>) -> Option<&Vec<Value>> {
    value.and_then(Value::as_array).filter(|list| !list.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn math_schema() -> Value {
        json!({
            "title": "MathResult",
            "type": "object",
            "required": ["answer", "explanation"],
            "properties": {
                "answer": {"type": "integer", "format": "int64"},
                "explanation": {"type": "string"}
            }
        })
    }

    #[test]
    fn seed_zero_fills_required_fields() {
        let schema = math_schema();
        let value = TestDataGenerator::new(&schema, 0).generate();
        assert_eq!(value, json!({"answer": 0, "explanation": "a"}));
    }

    #[test]
    fn seed_changes_values() {
        let schema = math_schema();
        let value = TestDataGenerator::new(&schema, 3).generate();
        assert_eq!(value, json!({"answer": 3, "explanation": "d"}));
    }

    #[test]
    fn token_rolls_over_alphabet() {
        let schema = json!({"type": "string"});
        assert_eq!(TestDataGenerator::new(&schema, 61).generate(), json!("9"));
        assert_eq!(TestDataGenerator::new(&schema, 62).generate(), json!("aa"));
    }

    #[test]
    fn optional_properties_are_skipped() {
        let schema = json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": {"type": "integer"},
                "note": {"type": ["string", "null"]}
            }
        });
        assert_eq!(TestDataGenerator::new(&schema, 0).generate(), json!({"id": 0}));
    }

    #[test]
    fn integer_bounds_are_respected() {
        let schema = json!({"type": "integer", "minimum": 5, "maximum": 10});
        assert_eq!(TestDataGenerator::new(&schema, 0).generate(), json!(5));
        assert_eq!(TestDataGenerator::new(&schema, 40).generate(), json!(10));

        let schema = json!({"type": "integer", "exclusiveMinimum": 0});
        assert_eq!(TestDataGenerator::new(&schema, 0).generate(), json!(1));
    }

    #[test]
    fn refs_enums_and_arrays() {
        let schema = json!({
            "type": "object",
            "required": ["color", "tags", "inner"],
            "properties": {
                "color": {"enum": ["red", "green"]},
                "tags": {"type": "array", "items": {"type": "string"}, "minItems": 2},
                "inner": {"$ref": "#/definitions/Inner"}
            },
            "definitions": {
                "Inner": {
                    "type": "object",
                    "required": ["flag"],
                    "properties": {"flag": {"type": "boolean"}}
                }
            }
        });
        let value = TestDataGenerator::new(&schema, 1).generate();
        assert_eq!(
            value,
            json!({"color": "green", "tags": ["b", "b"], "inner": {"flag": true}})
        );
    }

    #[test]
    fn string_formats() {
        let schema = json!({"type": "string", "format": "date"});
        assert_eq!(TestDataGenerator::new(&schema, 31).generate(), json!("2024-02-01"));

        let schema = json!({"type": "string", "minLength": 3});
        assert_eq!(TestDataGenerator::new(&schema, 0).generate(), json!("aaa"));
    }

    #[test]
    fn out_of_range_date_falls_back_to_token() {
        let schema = json!({"type": "string", "format": "date-time"});
        let value = TestDataGenerator::new(&schema, 1u64 << 50).generate();
        let text = value.as_str().unwrap();
        assert!(!text.ends_with("T00:00:00Z"));
        assert!(text.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn huge_seed_saturates_integers() {
        let schema = json!({"type": "integer"});
        assert_eq!(TestDataGenerator::new(&schema, u64::MAX).generate(), json!(i64::MAX));

        let schema = json!({"type": "integer", "maximum": 10});
        assert_eq!(TestDataGenerator::new(&schema, u64::MAX).generate(), json!(10));
    }

    #[test]
    fn recursive_ref_terminates() {
        let schema = json!({
            "$ref": "#/definitions/Node",
            "definitions": {
                "Node": {
                    "type": "object",
                    "required": ["next"],
                    "properties": {"next": {"$ref": "#/definitions/Node"}}
                }
            }
        });
        let value = TestDataGenerator::new(&schema, 0).generate();
        assert!(value.is_object());
    }
}
