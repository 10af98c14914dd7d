pub mod agent;
pub mod config;
pub mod error;
pub mod helpers;
pub mod result;

#[path = "llm/lib.rs"]
pub mod llm;
#[path = "schema/lib.rs"]
pub mod schema;
#[path = "tools/lib.rs"]
pub mod tools;

pub use agent::{create_agent, Agent, StructuredAgent};
pub use config::AgentConfig;
pub use error::{AgentError, SchemaValidationError, ValidationIssue};
pub use helpers::render_value;
pub use result::RunResult;
pub use schema::OutputSchema;
