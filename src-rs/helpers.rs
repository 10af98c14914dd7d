use std::env;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::llm::{LLMRouter, TestModel, TestModelConfig, TEST_PROVIDER};

pub fn env_or(key: &str, fallback: String) -> String {
    env_opt(key).unwrap_or(fallback)
}

pub fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn env_parse<T: FromStr>(key: &str, fallback: T) -> T {
    env_opt(key)
        .and_then(|raw| raw.parse::<T>().ok())
        .unwrap_or(fallback)
}

/// Splits a model id into `(provider, model)`. A bare id names both.
pub fn parse_model_id(model_id: &str) -> Result<(String, String), AgentError> {
    let trimmed = model_id.trim();
    if trimmed.is_empty() {
        return Err(AgentError::UnknownModel(model_id.to_string()));
    }
    match trimmed.split_once(':') {
        Some((provider, model)) if !provider.is_empty() && !model.is_empty() => {
            Ok((provider.to_string(), model.to_string()))
        }
        Some(_) => Err(AgentError::UnknownModel(model_id.to_string())),
        None => Ok((trimmed.to_string(), trimmed.to_string())),
    }
}

pub fn build_llm_router(cfg: &AgentConfig, default_provider: &str) -> LLMRouter {
    let mut router = LLMRouter::new(default_provider);
    let test_model = TestModel::new(TestModelConfig {
        seed: cfg.test_seed,
        custom_output_text: cfg.test_output_text.clone(),
        ..TestModelConfig::default()
    });
    router.register_provider(TEST_PROVIDER, Arc::new(test_model));
    router
}

/// Strings print bare; everything else prints as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
