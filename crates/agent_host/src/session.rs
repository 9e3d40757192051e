use crate::error::AgentError;
use crate::VibeAgent;
use shared::agent_api::ChatMessage;

/// Conversation context sent with each chat turn.
///
/// Holds completed turns only: a failed request leaves the history untouched.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    history: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Record a completed user/model exchange.
    pub fn record(&mut self, user: impl Into<String>, reply: impl Into<String>) {
        self.history.push(ChatMessage::user(user));
        self.history.push(ChatMessage::model(reply));
    }

    /// Send `message` with the current history and record the turn on success.
    pub async fn send(&mut self, agent: &VibeAgent, message: &str) -> Result<String, AgentError> {
        let reply = agent.chat(&self.history, message).await?;
        self.record(message, reply.clone());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;
    use shared::agent_api::ChatRole;
    use shared::settings::ModelSettings;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_send_records_turns() {
        let model = Arc::new(ScriptedModel::replying(vec![Ok("Hi there"), Ok("Sure")]));
        let agent = VibeAgent::new(ModelSettings::default(), model.clone());
        let mut session = ChatSession::new();

        session.send(&agent, "hello").await.unwrap();
        session.send(&agent, "help me").await.unwrap();

        assert_eq!(session.len(), 4);
        assert_eq!(session.history()[1].role, ChatRole::Model);
        assert_eq!(session.history()[1].content, "Hi there");
        // Second request carried the first exchange plus the new message
        assert_eq!(model.requests.lock()[1].messages.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_send_keeps_history() {
        let model = Arc::new(ScriptedModel::replying(vec![Ok("Hi"), Err("timeout")]));
        let agent = VibeAgent::new(ModelSettings::default(), model);
        let mut session = ChatSession::new();

        session.send(&agent, "hello").await.unwrap();
        assert!(session.send(&agent, "again").await.is_err());

        assert_eq!(session.len(), 2);
        assert_eq!(session.history()[0].content, "hello");
    }
}
