use crate::helpers::{env_opt, env_or, env_parse};

pub const DEFAULT_MODEL: &str = "test";

#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// `"test"` or `"<provider>:<model>"`.
    pub model: String,
    pub system_prompt: String,
    pub max_iterations: usize,
    pub temperature: f64,
    pub test_seed: u64,
    pub test_output_text: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
            max_iterations: 10,
            temperature: 0.3,
            test_seed: 0,
            test_output_text: None,
        }
    }
}

impl AgentConfig {
    pub fn for_model(model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..Self::default()
        }
    }

    /// Reads `AGENT_*` variables; anything unset or unparsable keeps its default.
    pub fn from_env() -> Self {
        Self::from_env_with_prefix("AGENT")
    }

    /// Same as [`AgentConfig::from_env`] with `<prefix>_*` variable names.
    pub fn from_env_with_prefix(prefix: &str) -> Self {
        let key = |name: &str| format!("{}_{}", prefix, name);
        let defaults = Self::default();
        Self {
            model: env_or(&key("MODEL"), defaults.model),
            system_prompt: env_or(&key("SYSTEM_PROMPT"), defaults.system_prompt),
            max_iterations: env_parse(&key("MAX_ITERATIONS"), defaults.max_iterations),
            temperature: env_parse(&key("TEMPERATURE"), defaults.temperature),
            test_seed: env_parse(&key("TEST_SEED"), defaults.test_seed),
            test_output_text: env_opt(&key("TEST_OUTPUT_TEXT")),
        }
    }
}
