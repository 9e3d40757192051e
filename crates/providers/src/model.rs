use anyhow::Result;
use shared::agent_api::ChatMessage;

/// A single generation call: model, optional system instruction and the turns.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub thinking_budget: Option<u32>,
    /// When set, the model is asked for JSON matching this schema
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: None,
            messages: Vec::new(),
            thinking_budget: None,
            response_schema: None,
        }
    }

    pub fn system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn history(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::user(content));
        self
    }

    pub fn thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }

    pub fn json_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Text-in, text-out model access.
///
/// Note: Uses async_trait for object safety
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider identifier, used in logs
    fn name(&self) -> &'static str;

    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::agent_api::ChatRole;

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("gemini-2.5-pro")
            .system("be brief")
            .history(vec![ChatMessage::user("hi"), ChatMessage::model("hello")])
            .user("next")
            .thinking_budget(1024);

        assert_eq!(request.system_instruction.as_deref(), Some("be brief"));
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[2].role, ChatRole::User);
        assert_eq!(request.thinking_budget, Some(1024));
        assert!(request.response_schema.is_none());
    }
}
