//! OpenAI-compatible `/chat/completions` client with strict JSON schema output.

use async_trait::async_trait;
use cur_config::LlmConfig;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::LlmError;
use crate::http::check_response;
use crate::{JsonRequest, LanguageModel};

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Chat completions client for OpenAI or any compatible endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::NotConfigured`] without an API key, or
    /// [`LlmError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        if !config.is_configured() {
            return Err(LlmError::NotConfigured);
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("curator/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| LlmError::Parse(format!("invalid API key header: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete_json(&self, request: &JsonRequest) -> Result<Value, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %request.model, schema = %request.schema_name, "chat completion request");

        let body = ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: &request.schema_name,
                    strict: true,
                    schema: &request.schema,
                },
            },
        };

        let resp = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let chat: ChatResponse = resp.json().await?;
        parse_content(chat)
    }
}

/// Extract the first choice's content and parse it as JSON.
fn parse_content(chat: ChatResponse) -> Result<Value, LlmError> {
    let message = chat
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| LlmError::EmptyResponse("no choices returned".to_string()))?;

    if let Some(refusal) = message.refusal.filter(|r| !r.is_empty()) {
        return Err(LlmError::EmptyResponse(format!("model refused: {refusal}")));
    }

    let content = message
        .content
        .ok_or_else(|| LlmError::EmptyResponse("choice has no content".to_string()))?;
    serde_json::from_str(strip_code_blocks(&content))
        .map_err(|e| LlmError::Parse(format!("content is not JSON: {e}")))
}

/// Strip a markdown code fence some compatible endpoints wrap JSON in.
fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const FIXTURE: &str = r#"{
        "id": "chatcmpl-abc",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "{\"relevance_score\": 8, \"rationale\": \"on topic\", \"suggested_section\": \"Research\"}",
                    "refusal": null
                },
                "finish_reason": "stop"
            }
        ]
    }"#;

    #[test]
    fn parses_chat_completion_fixture() {
        let chat: ChatResponse = serde_json::from_str(FIXTURE).unwrap();
        let value = parse_content(chat).unwrap();
        assert_eq!(value["relevance_score"], json!(8));
        assert_eq!(value["suggested_section"], json!("Research"));
    }

    #[test]
    fn refusal_is_an_empty_response() {
        let chat: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":null,"refusal":"I can't help with that"}}]}"#,
        )
        .unwrap();
        assert!(matches!(parse_content(chat), Err(LlmError::EmptyResponse(_))));
    }

    #[test]
    fn no_choices_is_an_empty_response() {
        let chat: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(parse_content(chat), Err(LlmError::EmptyResponse(_))));
    }

    #[test]
    fn non_json_content_is_a_parse_error() {
        let chat: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"Sure! Eight."}}]}"#)
                .unwrap();
        assert!(matches!(parse_content(chat), Err(LlmError::Parse(_))));
    }

    #[test]
    fn fenced_json_is_accepted() {
        assert_eq!(strip_code_blocks("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn request_serializes_strict_schema() {
        let schema = json!({"type": "object"});
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.3,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "relevance",
                    strict: true,
                    schema: &schema,
                },
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["response_format"]["type"], json!("json_schema"));
        assert_eq!(value["response_format"]["json_schema"]["strict"], json!(true));
        assert_eq!(value["messages"][0]["role"], json!("user"));
    }

    #[test]
    fn unconfigured_client_is_rejected() {
        assert!(matches!(
            OpenAiClient::from_config(&LlmConfig::default()),
            Err(LlmError::NotConfigured)
        ));
    }
}
