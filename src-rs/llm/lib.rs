pub mod router;
pub mod test_model;
pub mod types;

pub use router::LLMRouter;
pub use test_model::{TestModel, TestModelConfig, NO_TOOL_CALLS_TEXT, TEST_PROVIDER};
pub use types::{CompletionRequest, LLMResponse, Message, ProviderAdapter, ProviderError, Role, ToolCall};
