//! JSON schema builders and validation for structured model output
//!
//! Schemas use the OpenAPI-subset dialect accepted by Gemini's
//! `responseSchema` (upper-case type names). The same value can be embedded
//! into a prompt as text, sent as a response constraint, and used with
//! [`validate`] to check a decoded answer before typed deserialization.
//!
//! # Example
//!
//! ```
//! use agent_llm::schema;
//! use serde_json::json;
//!
//! let shape = schema::object(
//!     json!({
//!         "summary": schema::string("Final summary"),
//!         "finalScore": schema::integer("Score from 0 to 99"),
//!     }),
//!     vec!["summary", "finalScore"],
//! );
//!
//! assert!(schema::validate(&shape, &json!({ "summary": "ok", "finalScore": 72 })).is_ok());
//! assert!(schema::validate(&shape, &json!({ "summary": "ok" })).is_err());
//! ```

use serde_json::{Value, json};
use thiserror::Error;

/// Create a JSON schema for an object with properties
pub fn object(properties: Value, required: Vec<&str>) -> Value {
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

/// Object schema with a description
pub fn described_object(description: &str, properties: Value, required: Vec<&str>) -> Value {
    let mut schema = object(properties, required);
    schema["description"] = Value::String(description.to_string());
    schema
}

/// String property schema
pub fn string(description: &str) -> Value {
    json!({
        "type": "STRING",
        "description": description,
    })
}

/// Integer property schema
pub fn integer(description: &str) -> Value {
    json!({
        "type": "INTEGER",
        "description": description,
    })
}

/// Array property schema
pub fn array(description: &str, items: Value) -> Value {
    json!({
        "type": "ARRAY",
        "description": description,
        "items": items,
    })
}

/// A value that does not match its schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct SchemaViolation {
    /// JSON path of the offending value, e.g. `$.psyAnalysis.value`
    pub path: String,
    /// What was wrong at that path
    pub message: String,
}

/// Check `value` against `schema`
///
/// Required properties must be present and non-null. Properties not declared
/// in the schema are tolerated. Type names are compared case-insensitively.
pub fn validate(schema: &Value, value: &Value) -> Result<(), SchemaViolation> {
    validate_at("$", schema, value)
}

fn validate_at(path: &str, schema: &Value, value: &Value) -> Result<(), SchemaViolation> {
    let Some(kind) = schema.get("type").and_then(Value::as_str) else {
        return Ok(());
    };

    let violation = |message: String| SchemaViolation {
        path: path.to_string(),
        message,
    };

    match kind.to_ascii_lowercase().as_str() {
        "object" => {
            let fields = value
                .as_object()
                .ok_or_else(|| violation(format!("expected object, found {}", type_name(value))))?;

            if let Some(required) = schema.get("required").and_then(Value::as_array) {
                for name in required.iter().filter_map(Value::as_str) {
                    if fields.get(name).is_none_or(Value::is_null) {
                        return Err(violation(format!("missing required field `{name}`")));
                    }
                }
            }

            if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
                for (name, property) in properties {
                    if let Some(field) = fields.get(name).filter(|v| !v.is_null()) {
                        validate_at(&format!("{path}.{name}"), property, field)?;
                    }
                }
            }
            Ok(())
        }
        "array" => {
            let items = value
                .as_array()
                .ok_or_else(|| violation(format!("expected array, found {}", type_name(value))))?;
            if let Some(item_schema) = schema.get("items") {
                for (index, item) in items.iter().enumerate() {
                    validate_at(&format!("{path}[{index}]"), item_schema, item)?;
                }
            }
            Ok(())
        }
        "string" if value.is_string() => Ok(()),
        "number" if value.is_number() => Ok(()),
        "integer" if is_integral(value) => Ok(()),
        "boolean" if value.is_boolean() => Ok(()),
        "string" | "number" | "integer" | "boolean" => Err(violation(format!(
            "expected {}, found {}",
            kind.to_ascii_lowercase(),
            type_name(value)
        ))),
        other => Err(violation(format!("unsupported schema type `{other}`"))),
    }
}

fn is_integral(value: &Value) -> bool {
    value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|f| f.fract() == 0.0)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_shape() -> Value {
        object(
            json!({
                "headline": string("Headline"),
                "tags": array("Tags", string("Tag")),
                "detail": described_object(
                    "Detail block",
                    json!({ "rsi": string("RSI"), "kd": string("KD") }),
                    vec!["rsi", "kd"],
                ),
            }),
            vec!["headline", "tags", "detail"],
        )
    }

    #[test]
    fn test_schema_builders() {
        assert_eq!(string("test")["type"], "STRING");
        assert_eq!(integer("score")["type"], "INTEGER");
        assert_eq!(array("list", string("item"))["items"]["type"], "STRING");
        assert_eq!(described_object("d", json!({}), vec![])["description"], "d");
    }

    #[test]
    fn test_valid_document() {
        let doc = json!({
            "headline": "Up 3%",
            "tags": ["volume", "breakout"],
            "detail": { "rsi": "72", "kd": "golden cross" },
            "extra": "ignored",
        });
        assert!(validate(&nested_shape(), &doc).is_ok());
    }

    #[test]
    fn test_missing_nested_field() {
        let doc = json!({
            "headline": "Up 3%",
            "tags": [],
            "detail": { "rsi": "72" },
        });
        let err = validate(&nested_shape(), &doc).unwrap_err();
        assert_eq!(err.path, "$.detail");
        assert!(err.message.contains("`kd`"));
    }

    #[test]
    fn test_null_required_field_is_missing() {
        let doc = json!({ "headline": null, "tags": [], "detail": { "rsi": "", "kd": "" } });
        assert!(validate(&nested_shape(), &doc).is_err());
    }

    #[test]
    fn test_wrong_array_item_type() {
        let doc = json!({
            "headline": "x",
            "tags": ["ok", 3],
            "detail": { "rsi": "", "kd": "" },
        });
        let err = validate(&nested_shape(), &doc).unwrap_err();
        assert_eq!(err.path, "$.tags[1]");
        assert!(err.to_string().contains("expected string"));
    }

    #[test]
    fn test_integer_accepts_whole_floats_only() {
        let shape = integer("score");
        assert!(validate(&shape, &json!(72)).is_ok());
        assert!(validate(&shape, &json!(72.0)).is_ok());
        assert!(validate(&shape, &json!(72.5)).is_err());
        assert!(validate(&shape, &json!("72")).is_err());
    }

    #[test]
    fn test_lowercase_type_names() {
        let shape = json!({ "type": "object", "properties": {}, "required": ["a"] });
        assert!(validate(&shape, &json!({ "a": 1 })).is_ok());
        assert!(validate(&shape, &json!([])).is_err());
    }
}
