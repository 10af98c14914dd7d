use std::marker::PhantomData;

use log::{debug, warn};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::helpers::{build_llm_router, parse_model_id, render_value};
use crate::llm::{CompletionRequest, LLMResponse, LLMRouter, Message};
use crate::result::RunResult;
use crate::schema::OutputSchema;
use crate::tools::{ToolHandler, ToolRegistry, ToolSchema};

/// Builds an agent for `model_id`, optionally bound to a result schema.
pub fn create_agent(model_id: &str, schema: Option<OutputSchema>) -> Result<Agent, AgentError> {
    Agent::with_config(AgentConfig::for_model(model_id), schema)
}

pub struct Agent {
    config: AgentConfig,
    provider: String,
    model: String,
    router: LLMRouter,
    tools: ToolRegistry,
    output: Option<OutputSchema>,
}

impl Agent {
    /// An agent whose result is the model's text.
    pub fn new(model_id: &str) -> Result<Self, AgentError> {
        create_agent(model_id, None)
    }

    /// An agent whose result is validated against, and decoded into, `T`.
    pub fn structured<T>(model_id: &str) -> Result<StructuredAgent<T>, AgentError>
    where
        T: JsonSchema + DeserializeOwned,
    {
        StructuredAgent::new(AgentConfig::for_model(model_id))
    }

    pub fn with_config(mut config: AgentConfig, output: Option<OutputSchema>) -> Result<Self, AgentError> {
        if config.model.trim().is_empty() {
            return Err(AgentError::UnknownModel(config.model));
        }
        if config.max_iterations == 0 {
            config.max_iterations = AgentConfig::default().max_iterations;
        }
        let (provider, model) = parse_model_id(&config.model)?;
        let router = build_llm_router(&config, &provider);
        if !router.has_provider(&provider) {
            return Err(AgentError::UnknownModel(config.model));
        }
        debug!(
            "created agent for {} (structured: {})",
            config.model,
            output.as_ref().map(|schema| schema.name()).unwrap_or("no")
        );
        Ok(Self {
            config,
            provider,
            model,
            router,
            tools: ToolRegistry::new(),
            output,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.config.model
    }

    pub fn output_schema(&self) -> Option<&OutputSchema> {
        self.output.as_ref()
    }

    pub fn add_tool(&mut self, name: &str, handler: ToolHandler, schema: ToolSchema) -> Result<(), AgentError> {
        self.tools.register(name, handler, schema)
    }

    /// Runs one prompt to completion. The payload is a JSON string for
    /// text agents and the validated result object for structured ones.
    pub fn run_sync(&self, prompt: &str) -> Result<RunResult<Value>, AgentError> {
        let mut messages = vec![Message::system(&self.config.system_prompt), Message::user(prompt)];
        let tool_schemas = if self.tools.count() > 0 {
            Some(self.tools.get_schemas())
        } else {
            None
        };

        for iteration in 1..=self.config.max_iterations {
            let request = CompletionRequest {
                messages: messages.clone(),
                tools: tool_schemas.clone(),
                output: self.output.clone(),
                temperature: Some(self.config.temperature),
                model: Some(self.model.clone()),
                provider: Some(self.provider.clone()),
            };
            let response = self.router.complete(request)?;
            messages.push(Message::assistant(&response));

            if let Some(data) = self.final_output(&response)? {
                return Ok(RunResult::new(data, messages, iteration));
            }

            for call in &response.tool_calls {
                let result = self.tools.execute(&call.name, call.args.clone());
                let content = if result.success {
                    result.output.as_ref().map(render_value).unwrap_or_default()
                } else {
                    let error = result.error.unwrap_or_else(|| "unknown error".to_string());
                    warn!("tool {} failed: {}", call.name, error);
                    format!("Tool error: {}", error)
                };
                messages.push(Message::tool(&call.name, &content));
            }
        }

        Err(AgentError::MaxIterations(self.config.max_iterations))
    }

    fn final_output(&self, response: &LLMResponse) -> Result<Option<Value>, AgentError> {
        let schema = match &self.output {
            Some(schema) => schema,
            None if response.tool_calls.is_empty() => {
                return Ok(Some(Value::String(response.content.clone())));
            }
            None => return Ok(None),
        };

        if let Some(call) = response.tool_calls.iter().find(|call| call.name == schema.tool_name()) {
            schema.validate(&call.args)?;
            return Ok(Some(call.args.clone()));
        }
        if response.tool_calls.is_empty() {
            return Ok(Some(schema.parse_text(&response.content)?));
        }
        Ok(None)
    }
}

/// An [`Agent`] whose result is decoded into `T`.
pub struct StructuredAgent<T> {
    inner: Agent,
    schema: OutputSchema,
    _output: PhantomData<fn() -> T>,
}

impl<T> StructuredAgent<T>
where
    T: JsonSchema + DeserializeOwned,
{
    pub fn new(config: AgentConfig) -> Result<Self, AgentError> {
        let schema = OutputSchema::for_type::<T>()?;
        let inner = Agent::with_config(config, Some(schema.clone()))?;
        Ok(Self {
            inner,
            schema,
            _output: PhantomData,
        })
    }

    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    pub fn add_tool(&mut self, name: &str, handler: ToolHandler, schema: ToolSchema) -> Result<(), AgentError> {
        self.inner.add_tool(name, handler, schema)
    }

    pub fn run_sync(&self, prompt: &str) -> Result<RunResult<T>, AgentError> {
        let result = self.inner.run_sync(prompt)?;
        result.try_map(|data| self.schema.to_typed(data).map_err(AgentError::from))
    }
}
