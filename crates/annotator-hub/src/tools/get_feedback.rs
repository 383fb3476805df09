use std::collections::HashSet;
use std::time::Duration;

use annotator_protocol::catalog::GetFeedbackTool;
use annotator_protocol::CallToolResult;
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::state::AppState;

use super::{resolve, AnnotatorTool};

const DEADLINE: Duration = Duration::from_secs(15);

/// Keys present in every projection regardless of the caller's `fields`
/// selection (`§4.5`).
const ALWAYS_INCLUDED: &[&str] = &["index", "tagName", "cssSelector", "textContent", "comment", "componentData"];

/// Project one element-data object down to the always-included keys plus
/// whichever of `xpath`/`attributes`/`styles`/`children` the caller asked
/// for. Applied recursively to `children` only when that tag is present
/// (`§4.5`); the projection is monotone in the tag set by construction,
/// since every tag only ever adds a key, never removes one.
fn project_element(element: &Value, fields: &HashSet<&str>) -> Value {
    let mut projected = Map::new();
    for key in ALWAYS_INCLUDED {
        if let Some(value) = element.get(key) {
            projected.insert((*key).to_string(), value.clone());
        }
    }
    if fields.contains("xpath") {
        if let Some(value) = element.get("xpath") {
            projected.insert("xpath".to_string(), value.clone());
        }
    }
    if fields.contains("attributes") {
        if let Some(value) = element.get("attributes") {
            projected.insert("attributes".to_string(), value.clone());
        }
    }
    if fields.contains("styles") {
        if let Some(value) = element.get("computedStyles") {
            projected.insert("computedStyles".to_string(), value.clone());
        }
    }
    if fields.contains("children") {
        if let Some(children) = element.get("children").and_then(Value::as_array) {
            let projected_children: Vec<Value> =
                children.iter().map(|child| project_element(child, fields)).collect();
            projected.insert("children".to_string(), Value::Array(projected_children));
        }
    }
    Value::Object(projected)
}

fn parse_fields(args: &Value) -> HashSet<&str> {
    args.get("fields")
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[async_trait]
impl AnnotatorTool for GetFeedbackTool {
    async fn call(&self, state: &AppState, args: Value) -> CallToolResult {
        let entry = match resolve(state, &args) {
            Ok(entry) => entry,
            Err(result) => return result,
        };

        let elements = match super::invoke(&entry, "get-selected-elements", Value::Null, DEADLINE).await {
            Ok(value) => value,
            Err(result) => return result,
        };

        let Some(elements) = elements.as_array() else {
            return CallToolResult::text("No feedback selected. Use annotator_select_feedback first.");
        };
        if elements.is_empty() {
            return CallToolResult::text("No feedback selected. Use annotator_select_feedback first.");
        }

        let fields = parse_fields(&args);
        let projected: Vec<Value> = elements.iter().map(|element| project_element(element, &fields)).collect();
        CallToolResult::text(serde_json::to_string_pretty(&projected).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_element() -> Value {
        serde_json::json!({
            "index": 0,
            "tagName": "div",
            "xpath": "/html/body/div",
            "cssSelector": "#root > div",
            "textContent": "hello",
            "attributes": {"id": "root"},
            "computedStyles": {"color": "red"},
            "componentData": null,
            "comment": null,
            "children": [
                {
                    "index": 1,
                    "tagName": "span",
                    "xpath": "/html/body/div/span",
                    "cssSelector": "#root > div > span",
                    "textContent": "hi",
                    "attributes": {},
                    "children": [],
                }
            ],
        })
    }

    #[test]
    fn empty_field_set_omits_optional_keys() {
        let projected = project_element(&sample_element(), &HashSet::new());
        assert!(projected.get("xpath").is_none());
        assert!(projected.get("attributes").is_none());
        assert!(projected.get("computedStyles").is_none());
        assert!(projected.get("children").is_none());
        assert_eq!(projected["tagName"], "div");
    }

    #[test]
    fn children_tag_recurses_and_projects_descendants_too() {
        let fields: HashSet<&str> = ["children"].into_iter().collect();
        let projected = project_element(&sample_element(), &fields);
        let children = projected["children"].as_array().unwrap();
        assert_eq!(children.len(), 1);
        // the nested span wasn't asked for xpath, but "children" was requested,
        // so the tag applies uniformly down the tree.
        assert!(children[0].get("xpath").is_none());
    }

    #[test]
    fn projection_is_monotone_in_the_field_set() {
        let small: HashSet<&str> = ["xpath"].into_iter().collect();
        let big: HashSet<&str> = ["xpath", "attributes"].into_iter().collect();
        let small_projection = project_element(&sample_element(), &small);
        let big_projection = project_element(&sample_element(), &big);
        let small_keys = small_projection.as_object().unwrap().keys().collect::<HashSet<_>>();
        let big_keys = big_projection.as_object().unwrap().keys().collect::<HashSet<_>>();
        assert!(small_keys.is_subset(&big_keys));
    }
}
