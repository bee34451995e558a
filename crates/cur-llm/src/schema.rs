//! JSON schemas for strict structured output.
//!
//! OpenAI strict mode requires:
//! 1. `additionalProperties: false` on all object schemas
//! 2. every property listed in `required`, even nullable ones
//! 3. fully inlined schemas (no `$ref`)
//!
//! The same schema is used to validate what comes back, so a fake model in
//! tests is held to the contract a real one is.

use schemars::{JsonSchema, schema_for};
use serde_json::Value;

use crate::error::LlmError;

/// Generate a strict-mode schema for `T`.
#[must_use]
pub fn strict_schema<T: JsonSchema>() -> Value {
    let mut value = schema_for!(T).to_value();

    inline_refs(&mut value);
    fix_object_schemas(&mut value);
    strip_formats(&mut value);

    if let Value::Object(map) = &mut value {
        map.remove("$defs");
        map.remove("$schema");
    }

    value
}

/// Constrain a top-level string property to a fixed vocabulary.
///
/// Used for fields whose allowed values come from configuration.
pub fn restrict_to(schema: &mut Value, property: &str, allowed: &[String]) {
    if let Some(prop) = schema
        .get_mut("properties")
        .and_then(|props| props.get_mut(property))
        .and_then(Value::as_object_mut)
    {
        prop.insert(
            "enum".to_string(),
            Value::Array(allowed.iter().cloned().map(Value::String).collect()),
        );
    }
}

/// Validate `instance` against `schema`.
///
/// # Errors
///
/// Returns [`LlmError::SchemaViolation`] listing every violation, or
/// [`LlmError::Parse`] if the schema itself is unusable.
pub fn validate(schema: &Value, instance: &Value) -> Result<(), LlmError> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| LlmError::Parse(format!("invalid schema: {e}")))?;
    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LlmError::SchemaViolation { errors })
    }
}

fn fix_object_schemas(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type") == Some(&Value::String("object".to_string())) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                if let Some(Value::Object(props)) = map.get("properties") {
                    let all_keys: Vec<Value> =
                        props.keys().map(|k| Value::String(k.clone())).collect();
                    map.insert("required".to_string(), Value::Array(all_keys));
                }
            }
            for (_, v) in map.iter_mut() {
                fix_object_schemas(v);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                fix_object_schemas(item);
            }
        }
        _ => {}
    }
}

fn inline_refs(value: &mut Value) {
    let definitions = value.get("$defs").cloned();
    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/$defs/"))
                .and_then(|name| definitions.get(name))
                .cloned();
            if let Some(def) = target {
                *value = def;
                inline_refs_recursive(value, definitions);
                return;
            }
            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}

/// Drop numeric `format` hints (`double`, `uint`) that strict mode rejects.
fn strip_formats(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.contains_key("type") && map.get("format").is_some_and(Value::is_string) {
                map.remove("format");
            }
            for (_, v) in map.iter_mut() {
                strip_formats(v);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                strip_formats(item);
            }
        }
        _ => {}
    }
}
