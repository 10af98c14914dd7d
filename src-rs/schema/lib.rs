pub mod generate;
pub mod output;
pub mod validate;

use serde_json::Value;

pub use generate::TestDataGenerator;
pub use output::{OutputSchema, RESULT_TOOL_NAME};
pub use validate::{collect_issues, compile_schema};

/// Resolves a local `$ref` such as `#/definitions/Step` or `#/$defs/Step`.
pub(crate) fn resolve_ref<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }
    root.pointer(pointer)
}
