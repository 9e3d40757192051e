use crate::model::{GenerationRequest, LanguageModel};
use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::agent_api::{ChatMessage, ChatRole};
use shared::settings::ProviderAuth;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Header carrying the API key; keeps the key out of URLs and error text.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest slice of an error body we surface to the user.
const MAX_ERROR_BODY: usize = 800;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: Option<String>,
    /// Set on thought-summary parts of thinking models
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

pub struct GeminiClient {
    http: Client,
    auth_token: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            auth_token: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Build a client from stored settings. The environment override is applied
    /// when settings are loaded, so only `auth` is consulted here.
    pub fn from_auth(auth: &ProviderAuth, base_url: Option<&str>, timeout: Duration) -> Result<Self> {
        let auth_token = match auth.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Err(anyhow!("No Gemini API key configured (set GEMINI_API_KEY)")),
        };

        let mut client = Self::new(auth_token, timeout)?;
        if let Some(url) = base_url {
            client.base_url = url.trim_end_matches('/').to_string();
        }
        Ok(client)
    }
}

#[async_trait::async_trait]
impl LanguageModel for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        let body = build_request(&request);
        tracing::debug!(model = %request.model, turns = body.contents.len(), "Sending Gemini request");

        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, self.auth_token.as_str())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let body = body.trim();
            if body.is_empty() {
                return Err(anyhow!("gemini error: {}", status));
            }
            let body = if body.chars().count() > MAX_ERROR_BODY {
                format!("{}...", body.chars().take(MAX_ERROR_BODY).collect::<String>())
            } else {
                body.to_string()
            };
            return Err(anyhow!("gemini error: {}\n{}", status, body));
        }

        let body: GeminiResponse = resp
            .json()
            .await
            .map_err(|e| anyhow!("gemini returned an unreadable response: {}", e.without_url()))?;
        let text = extract_text(body);
        if text.trim().is_empty() {
            return Err(anyhow!("gemini returned an empty response"));
        }
        Ok(text)
    }
}

/// Strips the request URL from a reqwest error before it reaches logs or notices.
fn transport_error(e: reqwest::Error) -> anyhow::Error {
    let kind = if e.is_timeout() { "timeout" } else { "network error" };
    anyhow!("gemini {}: {:#}", kind, anyhow::Error::new(e.without_url()))
}

fn build_request(request: &GenerationRequest) -> GeminiRequest {
    let system_instruction = request.system_instruction.as_ref().map(|text| GeminiContent {
        role: None,
        parts: vec![GeminiPart { text: text.clone() }],
    });

    let contents = request.messages.iter().map(to_content).collect();

    let mut config = GenerationConfig::default();
    if let Some(budget) = request.thinking_budget {
        config.thinking_config = Some(ThinkingConfig {
            thinking_budget: budget,
        });
    }
    if let Some(schema) = &request.response_schema {
        config.response_mime_type = Some("application/json".to_string());
        config.response_schema = Some(schema.clone());
    }
    let generation_config = (config != GenerationConfig::default()).then_some(config);

    GeminiRequest {
        contents,
        system_instruction,
        generation_config,
    }
}

fn to_content(message: &ChatMessage) -> GeminiContent {
    let role = match message.role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    };
    GeminiContent {
        role: Some(role.to_string()),
        parts: vec![GeminiPart {
            text: message.content.clone(),
        }],
    }
}

/// Joins the non-thought text parts of the first candidate.
fn extract_text(response: GeminiResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|p| !p.thought)
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape_for_chat() {
        let request = GenerationRequest::new("gemini-2.5-flash")
            .system("You are Vibe Bot")
            .history(vec![ChatMessage::user("hi"), ChatMessage::model("hello")])
            .user("what is rust?");

        let value = serde_json::to_value(build_request(&request)).unwrap();

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "You are Vibe Bot");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][1]["role"], "model");
        assert_eq!(value["contents"][2]["parts"][0]["text"], "what is rust?");
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn test_request_shape_for_structured_generation() {
        let schema = json!({"type": "ARRAY", "items": {"type": "OBJECT"}});
        let request = GenerationRequest::new("gemini-2.5-pro")
            .user("scaffold a login form")
            .thinking_budget(32_768)
            .json_schema(schema.clone());

        let value = serde_json::to_value(build_request(&request)).unwrap();
        let config = &value["generationConfig"];

        assert_eq!(config["thinkingConfig"]["thinkingBudget"], 32_768);
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"], schema);
    }

    #[test]
    fn test_extract_text_skips_thoughts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "planning...", "thought": true},
                        {"text": "Hello, "},
                        {"text": "world"}
                    ]
                }
            }]
        }))
        .unwrap();

        assert_eq!(extract_text(response), "Hello, world");
    }

    #[test]
    fn test_extract_text_handles_blocked_response() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert_eq!(extract_text(response), "");

        let response: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(extract_text(response), "");
    }

    #[test]
    fn test_from_auth_prefers_configured_key() {
        let auth = ProviderAuth {
            api_key: Some("  test-key  ".to_string()),
        };
        let client =
            GeminiClient::from_auth(&auth, Some("http://localhost:8080/v1beta/"), Duration::from_secs(5))
                .unwrap();

        assert_eq!(client.auth_token, "test-key");
        assert_eq!(client.base_url, "http://localhost:8080/v1beta");
    }

    #[test]
    fn test_from_auth_requires_key() {
        let auth = ProviderAuth {
            api_key: Some("   ".to_string()),
        };
        let err = GeminiClient::from_auth(&auth, None, Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(err.to_string().contains("No Gemini API key"));
        assert!(GeminiClient::from_auth(&ProviderAuth::default(), None, Duration::from_secs(5)).is_err());
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_key() {
        let auth = ProviderAuth {
            api_key: Some("SECRET-KEY-123".to_string()),
        };
        // Nothing listens on the discard port
        let client = GeminiClient::from_auth(&auth, Some("http://127.0.0.1:9"), Duration::from_secs(5))
            .unwrap();

        let err = client
            .generate(GenerationRequest::new("m").user("hello"))
            .await
            .unwrap_err();
        let text = format!("{:#}", err);

        assert!(text.starts_with("gemini network error"), "{}", text);
        assert!(!text.contains("SECRET-KEY-123"), "{}", text);
        assert!(!text.contains("generateContent"), "{}", text);
    }
}
