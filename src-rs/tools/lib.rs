pub mod registry;
pub mod types;

pub use registry::ToolRegistry;
pub use types::{ToolEntry, ToolHandler, ToolResult, ToolSchema};
