//! A provider that never leaves the process.
//!
//! `TestModel` answers from the request alone: it calls every offered tool
//! once, then either calls the result tool with schema-generated arguments or
//! replies with fixed text. Identical requests always get identical answers.

use serde_json::{json, Map, Value};

use super::types::{CompletionRequest, LLMResponse, Message, ProviderAdapter, ProviderError, Role, ToolCall};
use crate::schema::TestDataGenerator;

pub const TEST_PROVIDER: &str = "test";

/// Text returned when no tool was called and no result schema was requested.
pub const NO_TOOL_CALLS_TEXT: &str = "success (no tool calls)";

#[derive(Clone, Debug, Default)]
pub struct TestModelConfig {
    /// Drives every generated value; 0 yields `0` for integers and `"a"` for strings.
    pub seed: u64,
    /// Replaces the default text reply when set.
    pub custom_output_text: Option<String>,
}

pub struct TestModel {
    cfg: TestModelConfig,
}

impl TestModel {
    pub fn new(cfg: TestModelConfig) -> Self {
        Self { cfg }
    }

    fn tool_calls(&self, request: &CompletionRequest) -> Option<Vec<ToolCall>> {
        let tools = request.tools.as_ref().filter(|tools| !tools.is_empty())?;
        let mut sorted: Vec<_> = tools.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        let calls = sorted
            .into_iter()
            .map(|tool| ToolCall {
                name: tool.name.clone(),
                args: match &tool.parameters {
                    Some(parameters) => TestDataGenerator::new(parameters, self.cfg.seed).generate(),
                    None => json!({}),
                },
            })
            .collect();
        Some(calls)
    }
}

impl ProviderAdapter for TestModel {
    fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        if request.messages.is_empty() {
            return Err(ProviderError::new("invalid_request", "no messages to respond to", false));
        }
        let returns: Vec<&Message> = request
            .messages
            .iter()
            .filter(|msg| msg.role == Role::Tool)
            .collect();

        if returns.is_empty() {
            if let Some(calls) = self.tool_calls(&request) {
                return Ok(LLMResponse::calls(calls));
            }
        }

        if let Some(output) = &request.output {
            let call = ToolCall {
                name: output.tool_name().to_string(),
                args: output.generate(self.cfg.seed),
            };
            return Ok(LLMResponse::calls(vec![call]));
        }

        if let Some(text) = &self.cfg.custom_output_text {
            return Ok(LLMResponse::text(text));
        }
        if returns.is_empty() {
            return Ok(LLMResponse::text(NO_TOOL_CALLS_TEXT));
        }

        let mut summary = Map::new();
        for msg in returns {
            let name = msg.tool_name.clone().unwrap_or_default();
            let value = serde_json::from_str(&msg.content).unwrap_or_else(|_| Value::String(msg.content.clone()));
            summary.insert(name, value);
        }
        Ok(LLMResponse::text(&Value::Object(summary).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OutputSchema;
    use crate::tools::ToolSchema;

    fn request(messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest {
            messages,
            tools: None,
            output: None,
            temperature: None,
            model: Some("test".to_string()),
            provider: Some(TEST_PROVIDER.to_string()),
        }
    }

    fn math_output() -> OutputSchema {
        OutputSchema::from_json(
            "MathResult",
            json!({
                "type": "object",
                "required": ["answer", "explanation"],
                "properties": {
                    "answer": {"type": "integer"},
                    "explanation": {"type": "string"}
                }
            }),
        )
        .unwrap()
    }

    fn weather_tool() -> ToolSchema {
        ToolSchema {
            name: "weather".to_string(),
            description: "Current weather".to_string(),
            parameters: Some(json!({
                "type": "object",
                "required": ["city"],
                "properties": {"city": {"type": "string"}}
            })),
        }
    }

    #[test]
    fn plain_text_without_tools_or_schema() {
        let model = TestModel::new(TestModelConfig::default());
        let response = model.complete(request(vec![Message::user("What is 2+2?")])).unwrap();
        assert_eq!(response.content, NO_TOOL_CALLS_TEXT);
        assert!(response.tool_calls.is_empty());
    }

    #[test]
    fn custom_text_overrides_default() {
        let model = TestModel::new(TestModelConfig {
            custom_output_text: Some("four".to_string()),
            ..TestModelConfig::default()
        });
        let response = model.complete(request(vec![Message::user("What is 2+2?")])).unwrap();
        assert_eq!(response.content, "four");
    }

    #[test]
    fn result_tool_called_with_generated_args() {
        let model = TestModel::new(TestModelConfig::default());
        let mut req = request(vec![Message::user("What is 2+2?")]);
        req.output = Some(math_output());

        let response = model.complete(req).unwrap();
        assert_eq!(
            response.tool_calls,
            vec![ToolCall {
                name: "final_result".to_string(),
                args: json!({"answer": 0, "explanation": "a"}),
            }]
        );
    }

    #[test]
    fn tools_called_once_then_summarised() {
        let model = TestModel::new(TestModelConfig::default());
        let mut first = request(vec![Message::user("weather?")]);
        first.tools = Some(vec![weather_tool()]);

        let response = model.complete(first.clone()).unwrap();
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].args, json!({"city": "a"}));

        let mut second = first;
        second.messages.push(Message::assistant(&response));
        second.messages.push(Message::tool("weather", "{\"temp\":21}"));
        let response = model.complete(second).unwrap();
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.content, r#"{"weather":{"temp":21}}"#);
    }

    #[test]
    fn empty_request_is_rejected() {
        let model = TestModel::new(TestModelConfig::default());
        let err = model.complete(request(Vec::new())).unwrap_err();
        assert_eq!(err.code, "invalid_request");
    }
}
