//! Gemini API client struct, request building, and response parsing.

use std::collections::HashMap;

use crate::tools::to_gemini_tool;
use crate::{AiError, AiResponse, Message, TokenUsage, ToolCall, ToolDefinition};

use super::config::GeminiConfig;

pub(crate) const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    pub(crate) fn api_url(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.config.model)
    }

    /// Build the JSON request body for the Gemini API.
    ///
    /// Tool traffic is mapped onto function parts: ai tool requests become
    /// `functionCall` parts and tool results become `functionResponse` parts.
    /// Gemini identifies function responses by name, not call id, so the
    /// name is recovered from the originating ai message.
    pub(crate) fn build_request_body(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> serde_json::Value {
        let mut contents = Vec::new();
        let mut call_names: HashMap<&str, &str> = HashMap::new();

        for msg in messages {
            match msg {
                Message::System { .. } => {} // handled via systemInstruction
                Message::Human { content } => {
                    contents.push(serde_json::json!({
                        "role": "user",
                        "parts": [{ "text": content }]
                    }));
                }
                Message::Ai {
                    content,
                    tool_calls,
                } => {
                    let mut parts = Vec::new();
                    if !content.is_empty() {
                        parts.push(serde_json::json!({ "text": content }));
                    }
                    for call in tool_calls {
                        call_names.insert(call.id.as_str(), call.name.as_str());
                        parts.push(serde_json::json!({
                            "functionCall": {
                                "name": call.name,
                                "args": call.arguments,
                            }
                        }));
                    }
                    // An ai message can be empty (e.g. a capped tool run);
                    // Gemini rejects a model turn with no parts.
                    if parts.is_empty() {
                        continue;
                    }
                    contents.push(serde_json::json!({
                        "role": "model",
                        "parts": parts
                    }));
                }
                Message::Tool { content, call_id } => {
                    let name = call_names.get(call_id.as_str()).copied().unwrap_or("unknown");
                    contents.push(serde_json::json!({
                        "role": "user",
                        "parts": [{
                            "functionResponse": {
                                "name": name,
                                "response": { "result": content },
                            }
                        }]
                    }));
                }
            }
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        });

        // System instruction
        for msg in messages {
            if let Message::System { content } = msg {
                body["systemInstruction"] = serde_json::json!({
                    "parts": [{ "text": content }]
                });
                break;
            }
        }

        if !tools.is_empty() {
            let tool_defs: Vec<_> = tools.iter().map(to_gemini_tool).collect();
            body["tools"] = serde_json::json!([{
                "functionDeclarations": tool_defs
            }]);
        }

        body
    }

    /// Parse a Gemini response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<AiResponse, AiError> {
        let candidates = json["candidates"]
            .as_array()
            .ok_or_else(|| AiError::ParseError("no candidates in response".to_string()))?;

        let first = candidates
            .first()
            .ok_or_else(|| AiError::ParseError("empty candidates".to_string()))?;

        let parts = first["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for part in &parts {
            if let Some(text) = part["text"].as_str() {
                content.push_str(text);
            }
            if let Some(fc) = part.get("functionCall") {
                // Gemini does not supply call ids; synthesize them.
                tool_calls.push(ToolCall {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: fc["name"].as_str().unwrap_or("").to_string(),
                    arguments: fc["args"].clone(),
                });
            }
        }

        let usage = TokenUsage {
            input_tokens: json["usageMetadata"]["promptTokenCount"]
                .as_u64()
                .unwrap_or(0),
            output_tokens: json["usageMetadata"]["candidatesTokenCount"]
                .as_u64()
                .unwrap_or(0),
        };

        Ok(AiResponse {
            content,
            tool_calls,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new(GeminiConfig::new("test-key").with_model("gemini-test"))
    }

    #[test]
    fn request_body_maps_roles_and_system_instruction() {
        let messages = vec![
            Message::system("be terse"),
            Message::human("hello"),
            Message::ai("hi there"),
        ];
        let body = client().build_request_body(&messages, &[]);

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be terse");
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "hello");
        assert_eq!(contents[1]["role"], "model");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn request_body_carries_function_call_round_trip() {
        let call = ToolCall {
            id: "call-1".to_string(),
            name: "get_current_fire_data".to_string(),
            arguments: serde_json::json!({"state": "up"}),
        };
        let messages = vec![
            Message::human("fires in up?"),
            Message::Ai {
                content: String::new(),
                tool_calls: vec![call],
            },
            Message::tool("No verified data.", "call-1"),
        ];
        let body = client().build_request_body(&messages, &[]);
        let contents = body["contents"].as_array().unwrap();

        let fc = &contents[1]["parts"][0]["functionCall"];
        assert_eq!(fc["name"], "get_current_fire_data");
        assert_eq!(fc["args"]["state"], "up");

        let fr = &contents[2]["parts"][0]["functionResponse"];
        assert_eq!(fr["name"], "get_current_fire_data");
        assert_eq!(fr["response"]["result"], "No verified data.");
    }

    #[test]
    fn request_body_attaches_tool_declarations() {
        let tools = vec![ToolDefinition {
            name: "search_web".to_string(),
            description: "Search the web.".to_string(),
            parameters: serde_json::json!({"type": "object"}),
        }];
        let body = client().build_request_body(&[Message::human("hi")], &tools);
        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "search_web"
        );
    }

    #[test]
    fn parse_response_extracts_text_and_calls() {
        let json = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "checking" },
                        { "functionCall": { "name": "search_web", "args": { "query": "fires" } } }
                    ]
                }
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 5 }
        });
        let response = client().parse_response(json).unwrap();
        assert_eq!(response.content, "checking");
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "search_web");
        assert!(!response.tool_calls[0].id.is_empty());
        assert_eq!(response.usage.total_tokens(), 17);
    }

    #[test]
    fn parse_response_rejects_missing_candidates() {
        let err = client()
            .parse_response(serde_json::json!({"error": "boom"}))
            .unwrap_err();
        assert!(matches!(err, AiError::ParseError(_)));
    }
}
