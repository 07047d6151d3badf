//! Tool namespace served over MCP.
//!
//! Tools come from four places:
//! - Core tools that are always on (`run_glif`, `glif_info`)
//! - Optional groups switched by environment flags
//! - Saved bindings persisted in the [`SavedToolStore`]
//! - Glif ids listed in `GLIF_IDS`
//!
//! [`ToolRegistry`] merges them per request.

pub mod bound;
pub mod builtin;
pub mod sanitize;
pub mod store;

mod registry;
mod runner;
mod tool;

pub use bound::BoundGlifTool;
pub use registry::{ToolGroup, ToolRegistry};
pub use runner::GlifRunner;
pub use sanitize::{MAX_TOOL_NAME_LEN, is_valid_tool_name, sanitize_tool_name};
pub use store::{SavedBinding, SavedToolStore, parse_id_list, resolve_tool_name};
pub use tool::{
    Tool, ToolDefinition, ToolError, parse_params, require_str, validate_tool_schema,
};
