use std::process;

use log::info;
use schemars::JsonSchema;
use serde::Deserialize;

use structured_agent_rs::{render_value, Agent, AgentError};

const PROMPT: &str = "What is 2+2?";

#[derive(Debug, Deserialize, JsonSchema)]
struct MathResult {
    answer: i64,
    explanation: String,
}

fn run() -> Result<(), AgentError> {
    let agent = Agent::new("test")?;
    let result = agent.run_sync(PROMPT)?;
    info!("basic run finished after {} request(s)", result.iterations);
    println!("Basic test result: {}", render_value(&result.data));

    let agent = Agent::structured::<MathResult>("test")?;
    let result = agent.run_sync(PROMPT)?;
    info!("structured run finished after {} request(s)", result.iterations);
    println!("\nStructured test result: {:?}", result.data);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("smoke test failed: {}", err);
        process::exit(1);
    }
}
