//! Provider-format conversion for tool definitions.

use crate::ToolDefinition;

/// Convert a tool definition to the Gemini function-declaration format.
pub fn to_gemini_tool(tool: &ToolDefinition) -> serde_json::Value {
    serde_json::json!({
        "name": tool.name,
        "description": tool.description,
        "parameters": tool.parameters,
    })
}
