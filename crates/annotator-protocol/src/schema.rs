//! JSON Schema subset used for MCP tool input/output schemas.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonSchema {
    String {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
        enum_values: Option<Vec<String>>,
    },
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        minimum: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        maximum: Option<f64>,
    },
    Boolean {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Array {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        items: Box<JsonSchema>,
    },
    Object {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        properties: HashMap<String, JsonSchema>,
        #[serde(skip_serializing_if = "Option::is_none")]
        required: Option<Vec<String>>,
    },
}

impl JsonSchema {
    pub fn string() -> Self {
        JsonSchema::String { description: None, enum_values: None }
    }

    pub fn string_with_description(description: impl Into<String>) -> Self {
        JsonSchema::String { description: Some(description.into()), enum_values: None }
    }

    pub fn string_enum(values: &[&str], description: impl Into<String>) -> Self {
        JsonSchema::String {
            description: Some(description.into()),
            enum_values: Some(values.iter().map(|v| v.to_string()).collect()),
        }
    }

    pub fn number_with_description(description: impl Into<String>) -> Self {
        JsonSchema::Number { description: Some(description.into()), minimum: None, maximum: None }
    }

    pub fn number_range(description: impl Into<String>, minimum: f64, maximum: f64) -> Self {
        JsonSchema::Number {
            description: Some(description.into()),
            minimum: Some(minimum),
            maximum: Some(maximum),
        }
    }

    pub fn boolean_with_description(description: impl Into<String>) -> Self {
        JsonSchema::Boolean { description: Some(description.into()) }
    }

    pub fn array_of(items: JsonSchema, description: impl Into<String>) -> Self {
        JsonSchema::Array { description: Some(description.into()), items: Box::new(items) }
    }
}

/// The `inputSchema`/`outputSchema` shape of an MCP tool: always a JSON object schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, JsonSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl ToolSchema {
    pub fn object() -> Self {
        Self { schema_type: "object".to_string(), properties: None, required: None }
    }

    pub fn with_properties(mut self, properties: HashMap<String, JsonSchema>) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_required(mut self, required: Vec<String>) -> Self {
        self.required = Some(required);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_schema_round_trips_through_json() {
        let schema = ToolSchema::object()
            .with_properties(HashMap::from([
                ("sessionId".to_string(), JsonSchema::string_with_description("target session")),
            ]))
            .with_required(vec![]);
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "object");
        assert!(value["properties"]["sessionId"].is_object());
    }
}
