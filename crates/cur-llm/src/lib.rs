//! # cur-llm
//!
//! Structured-output language model access for Curator.
//!
//! Callers describe the JSON they want with a schema generated from a Rust
//! type ([`schema::strict_schema`]), send it through a [`LanguageModel`], and
//! get back a typed value via [`structured`]. The returned JSON is validated
//! against the schema before it is deserialized, whatever the implementation.

mod client;
mod error;
mod http;
pub mod schema;

pub use client::OpenAiClient;
pub use error::LlmError;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One structured-output request.
#[derive(Debug, Clone)]
pub struct JsonRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    /// Name reported to the API for the schema (`[a-zA-Z0-9_-]`).
    pub schema_name: String,
    pub schema: Value,
}

/// A model that answers with JSON conforming to a requested schema.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Return the raw JSON the model produced for `request`.
    async fn complete_json(&self, request: &JsonRequest) -> Result<Value, LlmError>;
}

/// Call `model`, validate the answer against `request.schema`, and deserialize it.
///
/// # Errors
///
/// Propagates the model's error, [`LlmError::SchemaViolation`] if the JSON
/// breaks the schema, or [`LlmError::Parse`] if it does not fit `T`.
pub async fn structured<T: DeserializeOwned>(
    model: &dyn LanguageModel,
    request: &JsonRequest,
) -> Result<T, LlmError> {
    let value = model.complete_json(request).await?;
    schema::validate(&request.schema, &value)?;
    serde_json::from_value(value).map_err(|e| LlmError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, JsonSchema, PartialEq)]
    struct Answer {
        value: i64,
    }

    struct Canned(Value);

    #[async_trait]
    impl LanguageModel for Canned {
        async fn complete_json(&self, _request: &JsonRequest) -> Result<Value, LlmError> {
            Ok(self.0.clone())
        }
    }

    fn request() -> JsonRequest {
        JsonRequest {
            model: "test".into(),
            system: "system".into(),
            user: "user".into(),
            temperature: 0.0,
            schema_name: "answer".into(),
            schema: schema::strict_schema::<Answer>(),
        }
    }

    #[tokio::test]
    async fn structured_deserializes_valid_json() {
        let model = Canned(json!({"value": 42}));
        let answer: Answer = structured(&model, &request()).await.unwrap();
        assert_eq!(answer, Answer { value: 42 });
    }

    #[tokio::test]
    async fn structured_rejects_schema_violations() {
        let model = Canned(json!({"value": "forty-two"}));
        let result: Result<Answer, _> = structured(&model, &request()).await;
        assert!(matches!(result, Err(LlmError::SchemaViolation { .. })));
    }
}
