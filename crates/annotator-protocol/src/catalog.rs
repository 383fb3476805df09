//! The static MCP tool catalog (`§4.5`): names, descriptions, and input
//! schemas for the nine annotator tools. Shared by the hub (which also
//! implements each tool's `call`) and the bridge (which only needs the
//! descriptors plus the event name each tool forwards to over the wire),
//! so the two MCP fronts can never disagree on what a tool is called or
//! what arguments it takes.

use std::collections::HashMap;
use std::time::Duration;

use crate::schema::{JsonSchema, ToolSchema};
use crate::tool::{HasAnnotations, HasBaseMetadata, HasDescription, HasInputSchema, HasOutputSchema, HasToolMeta, Tool, ToolDefinition};

pub struct ListSessionsTool;
pub struct GetPageContextTool;
pub struct SelectFeedbackTool;
pub struct GetFeedbackTool;
pub struct CaptureScreenshotTool;
pub struct ClearFeedbackTool;
pub struct InjectCssTool;
pub struct InjectJsTool;
pub struct GetConsoleTool;

impl HasBaseMetadata for ListSessionsTool {
    fn name(&self) -> &str {
        "annotator_list_sessions"
    }
}
impl HasDescription for ListSessionsTool {
    fn description(&self) -> &str {
        "List currently connected browser sessions"
    }
}
impl HasInputSchema for ListSessionsTool {
    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object().with_properties(HashMap::new())
    }
}
impl HasOutputSchema for ListSessionsTool {}
impl HasAnnotations for ListSessionsTool {}
impl HasToolMeta for ListSessionsTool {}

impl HasBaseMetadata for GetPageContextTool {
    fn name(&self) -> &str {
        "annotator_get_page_context"
    }
}
impl HasDescription for GetPageContextTool {
    fn description(&self) -> &str {
        "Get the URL, title, and selection state of a connected browser session"
    }
}
impl HasInputSchema for GetPageContextTool {
    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .with_properties(HashMap::from([(
                "sessionId".to_string(),
                JsonSchema::string_with_description("Target session id; omit to auto-select the only session"),
            )]))
            .with_required(vec![])
    }
}
impl HasOutputSchema for GetPageContextTool {}
impl HasAnnotations for GetPageContextTool {}
impl HasToolMeta for GetPageContextTool {}

impl HasBaseMetadata for SelectFeedbackTool {
    fn name(&self) -> &str {
        "annotator_select_feedback"
    }
}
impl HasDescription for SelectFeedbackTool {
    fn description(&self) -> &str {
        "Put a browser session into element-inspect mode, or select an element by CSS/XPath"
    }
}
impl HasInputSchema for SelectFeedbackTool {
    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .with_properties(HashMap::from([
                ("sessionId".to_string(), JsonSchema::string_with_description("Target session id")),
                ("mode".to_string(), JsonSchema::string_enum(&["inspect", "selector"], "Selection mode")),
                ("selector".to_string(), JsonSchema::string_with_description("Selector to apply in selector mode")),
                (
                    "selectorType".to_string(),
                    JsonSchema::string_enum(&["css", "xpath"], "How to interpret `selector`"),
                ),
            ]))
            .with_required(vec!["mode".to_string()])
    }
}
impl HasOutputSchema for SelectFeedbackTool {}
impl HasAnnotations for SelectFeedbackTool {}
impl HasToolMeta for SelectFeedbackTool {}

impl HasBaseMetadata for GetFeedbackTool {
    fn name(&self) -> &str {
        "annotator_get_feedback"
    }
}
impl HasDescription for GetFeedbackTool {
    fn description(&self) -> &str {
        "Get the elements currently selected in a browser session, with optional field projection"
    }
}
impl HasInputSchema for GetFeedbackTool {
    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .with_properties(HashMap::from([
                ("sessionId".to_string(), JsonSchema::string_with_description("Target session id")),
                (
                    "fields".to_string(),
                    JsonSchema::array_of(
                        JsonSchema::string_enum(&["xpath", "attributes", "styles", "children"], "field tag"),
                        "Optional extra fields to include in each element",
                    ),
                ),
            ]))
            .with_required(vec![])
    }
}
impl HasOutputSchema for GetFeedbackTool {}
impl HasAnnotations for GetFeedbackTool {}
impl HasToolMeta for GetFeedbackTool {}

impl HasBaseMetadata for CaptureScreenshotTool {
    fn name(&self) -> &str {
        "annotator_capture_screenshot"
    }
}
impl HasDescription for CaptureScreenshotTool {
    fn description(&self) -> &str {
        "Capture a screenshot of the page, or of one element when `selector` is given"
    }
}
impl HasInputSchema for CaptureScreenshotTool {
    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .with_properties(HashMap::from([
                ("sessionId".to_string(), JsonSchema::string_with_description("Target session id")),
                ("selector".to_string(), JsonSchema::string_with_description("CSS selector of the element to capture")),
                ("quality".to_string(), JsonSchema::number_range("JPEG/WebP quality", 0.0, 1.0)),
            ]))
            .with_required(vec![])
    }
}
impl HasOutputSchema for CaptureScreenshotTool {}
impl HasAnnotations for CaptureScreenshotTool {}
impl HasToolMeta for CaptureScreenshotTool {}

impl HasBaseMetadata for ClearFeedbackTool {
    fn name(&self) -> &str {
        "annotator_clear_feedback"
    }
}
impl HasDescription for ClearFeedbackTool {
    fn description(&self) -> &str {
        "Clear the current element selection in a browser session"
    }
}
impl HasInputSchema for ClearFeedbackTool {
    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .with_properties(HashMap::from([(
                "sessionId".to_string(),
                JsonSchema::string_with_description("Target session id"),
            )]))
            .with_required(vec![])
    }
}
impl HasOutputSchema for ClearFeedbackTool {}
impl HasAnnotations for ClearFeedbackTool {}
impl HasToolMeta for ClearFeedbackTool {}

impl HasBaseMetadata for InjectCssTool {
    fn name(&self) -> &str {
        "annotator_inject_css"
    }
}
impl HasDescription for InjectCssTool {
    fn description(&self) -> &str {
        "Inject a CSS stylesheet into a browser session"
    }
}
impl HasInputSchema for InjectCssTool {
    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .with_properties(HashMap::from([
                ("sessionId".to_string(), JsonSchema::string_with_description("Target session id")),
                ("css".to_string(), JsonSchema::string_with_description("CSS source to inject")),
            ]))
            .with_required(vec!["css".to_string()])
    }
}
impl HasOutputSchema for InjectCssTool {}
impl HasAnnotations for InjectCssTool {}
impl HasToolMeta for InjectCssTool {}

impl HasBaseMetadata for InjectJsTool {
    fn name(&self) -> &str {
        "annotator_inject_js"
    }
}
impl HasDescription for InjectJsTool {
    fn description(&self) -> &str {
        "Execute a snippet of JavaScript in a browser session"
    }
}
impl HasInputSchema for InjectJsTool {
    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .with_properties(HashMap::from([
                ("sessionId".to_string(), JsonSchema::string_with_description("Target session id")),
                ("code".to_string(), JsonSchema::string_with_description("JavaScript source to execute")),
            ]))
            .with_required(vec!["code".to_string()])
    }
}
impl HasOutputSchema for InjectJsTool {}
impl HasAnnotations for InjectJsTool {}
impl HasToolMeta for InjectJsTool {}

impl HasBaseMetadata for GetConsoleTool {
    fn name(&self) -> &str {
        "annotator_get_console"
    }
}
impl HasDescription for GetConsoleTool {
    fn description(&self) -> &str {
        "Retrieve console log entries captured from a browser session"
    }
}
impl HasInputSchema for GetConsoleTool {
    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .with_properties(HashMap::from([
                ("sessionId".to_string(), JsonSchema::string_with_description("Target session id")),
                ("clear".to_string(), JsonSchema::boolean_with_description("Clear the console buffer after reading")),
            ]))
            .with_required(vec![])
    }
}
impl HasOutputSchema for GetConsoleTool {}
impl HasAnnotations for GetConsoleTool {}
impl HasToolMeta for GetConsoleTool {}

/// One descriptor per tool, in the fixed order `tools/list` advertises them.
pub fn all_tool_descriptors() -> Vec<Tool> {
    vec![
        ListSessionsTool.descriptor(),
        GetPageContextTool.descriptor(),
        SelectFeedbackTool.descriptor(),
        GetFeedbackTool.descriptor(),
        CaptureScreenshotTool.descriptor(),
        ClearFeedbackTool.descriptor(),
        InjectCssTool.descriptor(),
        InjectJsTool.descriptor(),
        GetConsoleTool.descriptor(),
    ]
}

/// The bridge-to-hub wire event each MCP tool forwards a `tools/call`
/// through (`§4.6`/`§6`: "one named event per MCP tool"). Event names track
/// the underlying browser procedure, not the MCP tool name, since that is
/// what both ends of the bridge connection agree on.
const TOOL_EVENTS: &[(&str, &str)] = &[
    ("annotator_list_sessions", "list-sessions"),
    ("annotator_get_page_context", "get-page-context"),
    ("annotator_select_feedback", "trigger-selection"),
    ("annotator_get_feedback", "get-selected-elements"),
    ("annotator_capture_screenshot", "capture-screenshot"),
    ("annotator_clear_feedback", "clear-selection"),
    ("annotator_inject_css", "inject-css"),
    ("annotator_inject_js", "inject-js"),
    ("annotator_get_console", "get-console"),
];

/// The `mcp:<event>` name registered on the bridge's `RpcPeer` to the hub
/// for a given MCP tool name, or `None` if `tool_name` isn't one of ours.
pub fn bridge_event_for_tool(tool_name: &str) -> Option<String> {
    TOOL_EVENTS
        .iter()
        .find(|(name, _)| *name == tool_name)
        .map(|(_, event)| format!("mcp:{event}"))
}

/// Per-tool call deadline (`§4.5`/`§6`): 15s default, 10s for the cheaper
/// reads, 30s for the screenshot tool.
pub fn deadline_for_tool(tool_name: &str) -> Duration {
    match tool_name {
        "annotator_capture_screenshot" => Duration::from_secs(30),
        "annotator_list_sessions" | "annotator_get_page_context" | "annotator_select_feedback" | "annotator_clear_feedback" | "annotator_inject_css" => {
            Duration::from_secs(10)
        }
        _ => Duration::from_secs(15),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_nine_tools() {
        assert_eq!(all_tool_descriptors().len(), 9);
    }

    #[test]
    fn every_tool_has_a_bridge_event() {
        for tool in all_tool_descriptors() {
            assert!(bridge_event_for_tool(&tool.name).is_some(), "missing bridge event for {}", tool.name);
        }
    }

    #[test]
    fn unknown_tool_has_no_bridge_event() {
        assert!(bridge_event_for_tool("not_a_tool").is_none());
    }
}
