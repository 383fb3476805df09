//! MCP tool metadata types, following the fine-grained trait composition used
//! throughout the framework this crate is built against: a tool definition is
//! assembled from several single-responsibility traits rather than one large
//! one, so manual implementations stay small and uniform.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::ToolSchema;

pub trait HasBaseMetadata {
    fn name(&self) -> &str;
    fn title(&self) -> Option<&str> {
        None
    }
}

pub trait HasDescription {
    fn description(&self) -> &str;
}

pub trait HasInputSchema {
    fn input_schema(&self) -> ToolSchema;
}

pub trait HasOutputSchema {
    fn output_schema(&self) -> Option<ToolSchema> {
        None
    }
}

pub trait HasAnnotations {
    fn annotations(&self) -> Option<Value> {
        None
    }
}

pub trait HasToolMeta {
    fn tool_meta(&self) -> Option<Value> {
        None
    }
}

/// Blanket trait composing the `Has*` facets into a single definition every
/// concrete tool gets for free once it implements each facet.
pub trait ToolDefinition:
    HasBaseMetadata + HasDescription + HasInputSchema + HasOutputSchema + HasAnnotations + HasToolMeta
{
    fn descriptor(&self) -> Tool {
        Tool {
            name: self.name().to_string(),
            title: self.title().map(|t| t.to_string()),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
            output_schema: self.output_schema(),
            annotations: self.annotations(),
            meta: self.tool_meta(),
        }
    }
}

impl<T> ToolDefinition for T where
    T: HasBaseMetadata + HasDescription + HasInputSchema + HasOutputSchema + HasAnnotations + HasToolMeta
{
}

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: ToolSchema,
    #[serde(rename = "outputSchema", skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<ToolSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Value>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// A single piece of tool-result content. The hub only ever produces `Text`
/// content: every outcome, success or failure, is rendered as prose (see the
/// content-formatting design note).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolResult {
    Text { text: String },
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        ToolResult::Text { text: text.into() }
    }
}

/// The result of a `tools/call` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<ToolResult>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    pub fn success(content: Vec<ToolResult>) -> Self {
        Self { content, is_error: None }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::success(vec![ToolResult::text(text)])
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { content: vec![ToolResult::text(text)], is_error: Some(true) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct PingTool;

    impl HasBaseMetadata for PingTool {
        fn name(&self) -> &str {
            "annotator_ping_test"
        }
    }
    impl HasDescription for PingTool {
        fn description(&self) -> &str {
            "test tool"
        }
    }
    impl HasInputSchema for PingTool {
        fn input_schema(&self) -> ToolSchema {
            ToolSchema::object().with_properties(HashMap::new())
        }
    }
    impl HasOutputSchema for PingTool {}
    impl HasAnnotations for PingTool {}
    impl HasToolMeta for PingTool {}

    #[test]
    fn descriptor_assembles_from_facets() {
        let descriptor = PingTool.descriptor();
        assert_eq!(descriptor.name, "annotator_ping_test");
        assert_eq!(descriptor.description, "test tool");
        assert!(descriptor.output_schema.is_none());
    }

    #[test]
    fn call_tool_result_error_sets_flag() {
        let result = CallToolResult::error("Error: no-browser-connected");
        assert_eq!(result.is_error, Some(true));
    }
}
