//! Agent Host - the AI side of the editor
//!
//! This crate turns editor actions into model requests:
//! - Chat with Vibe Bot, keeping conversation history
//! - Analyze or refactor the active file
//! - Scaffold files and folders from a description (structured generation)

pub mod error;
pub mod prompts;
pub mod scaffold;
pub mod session;

pub use error::AgentError;
pub use scaffold::parse_scaffold_response;
pub use session::ChatSession;

use providers::{GeminiClient, GenerationRequest, LanguageModel};
use shared::agent_api::{AiMode, ChatMessage};
use shared::scaffold::ScaffoldFile;
use shared::settings::ModelSettings;
use std::sync::Arc;
use std::time::Duration;

/// Agent that owns the model handle and the per-action model choices.
#[derive(Clone)]
pub struct VibeAgent {
    settings: ModelSettings,
    model: Arc<dyn LanguageModel>,
}

impl VibeAgent {
    pub fn new(settings: ModelSettings, model: Arc<dyn LanguageModel>) -> Self {
        Self { settings, model }
    }

    /// Agent backed by the Gemini REST API.
    pub fn from_settings(settings: ModelSettings) -> anyhow::Result<Self> {
        let client = GeminiClient::from_auth(
            &settings.gemini_auth,
            settings.api_base_url.as_deref(),
            Duration::from_secs(settings.request_timeout_secs),
        )?;
        Ok(Self::new(settings, Arc::new(client)))
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// One chat turn on top of `history` (previous successful turns only).
    pub async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String, AgentError> {
        let message = non_empty(message)?;
        let request = GenerationRequest::new(&self.settings.chat_model)
            .system(prompts::VIBE_BOT_SYSTEM_PROMPT)
            .history(history.iter().cloned())
            .user(message);
        self.generate(request).await
    }

    pub async fn analyze(&self, code: &str) -> Result<String, AgentError> {
        let code = non_empty(code)?;
        let request =
            GenerationRequest::new(&self.settings.analyze_model).user(prompts::analyze_prompt(code));
        self.generate(request).await
    }

    pub async fn refactor(&self, code: &str) -> Result<String, AgentError> {
        let code = non_empty(code)?;
        let request = GenerationRequest::new(&self.settings.refactor_model)
            .user(prompts::refactor_prompt(code))
            .thinking_budget(self.settings.refactor_thinking_budget);
        self.generate(request).await
    }

    pub async fn run_action(&self, mode: AiMode, code: &str) -> Result<String, AgentError> {
        match mode {
            AiMode::Analyze => self.analyze(code).await,
            AiMode::Refactor => self.refactor(code).await,
        }
    }

    /// Ask for a list of files to create. Folders are implied by the paths.
    pub async fn scaffold(&self, request: &str) -> Result<Vec<ScaffoldFile>, AgentError> {
        let request = non_empty(request)?;
        let request = GenerationRequest::new(&self.settings.scaffold_model)
            .user(prompts::scaffold_prompt(request))
            .json_schema(prompts::scaffold_schema());
        let text = self.generate(request).await?;
        parse_scaffold_response(&text)
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, AgentError> {
        let model = request.model.clone();
        tracing::info!(provider = self.model.name(), model = %model, "AI request");
        match self.model.generate(request).await {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(provider = self.model.name(), model = %model, error = %e, "AI request failed");
                Err(AgentError::Provider(e))
            }
        }
    }
}

fn non_empty(input: &str) -> Result<&str, AgentError> {
    if input.trim().is_empty() {
        Err(AgentError::EmptyInput)
    } else {
        Ok(input)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use anyhow::{anyhow, Result};
    use parking_lot::Mutex;
    use providers::{GenerationRequest, LanguageModel};
    use std::collections::VecDeque;

    /// Replays canned replies and records every request.
    #[derive(Default)]
    pub struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, String>>>,
        pub requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedModel {
        pub fn replying(replies: Vec<Result<&str, &str>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl LanguageModel for ScriptedModel {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn generate(&self, request: GenerationRequest) -> Result<String> {
            self.requests.lock().push(request);
            match self.replies.lock().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(e)) => Err(anyhow!(e)),
                None => Err(anyhow!("no scripted reply left")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedModel;
    use super::*;

    fn agent(model: Arc<ScriptedModel>) -> VibeAgent {
        VibeAgent::new(ModelSettings::default(), model)
    }

    #[tokio::test]
    async fn test_chat_sends_system_prompt_and_history() {
        let model = Arc::new(ScriptedModel::replying(vec![Ok("Rust is a language.")]));
        let history = vec![ChatMessage::user("hi"), ChatMessage::model("hello!")];

        let reply = agent(model.clone()).chat(&history, "what is rust?").await.unwrap();
        assert_eq!(reply, "Rust is a language.");

        let requests = model.requests.lock();
        assert_eq!(requests[0].model, "gemini-2.5-flash");
        assert_eq!(
            requests[0].system_instruction.as_deref(),
            Some(prompts::VIBE_BOT_SYSTEM_PROMPT)
        );
        assert_eq!(requests[0].messages.len(), 3);
    }

    #[tokio::test]
    async fn test_actions_pick_models() {
        let model = Arc::new(ScriptedModel::replying(vec![Ok("overview"), Ok("```js\n```")]));
        let agent = agent(model.clone());

        agent.run_action(AiMode::Analyze, "let a = 1;").await.unwrap();
        agent.run_action(AiMode::Refactor, "let a = 1;").await.unwrap();

        let requests = model.requests.lock();
        assert_eq!(requests[0].model, "gemini-2.5-flash-lite");
        assert_eq!(requests[0].thinking_budget, None);
        assert_eq!(requests[1].model, "gemini-2.5-pro");
        assert_eq!(requests[1].thinking_budget, Some(32_768));
    }

    #[tokio::test]
    async fn test_scaffold_parses_files() {
        let model = Arc::new(ScriptedModel::replying(vec![Ok(
            "```json\n[{\"path\": \"src/Login.tsx\", \"content\": \"export {}\"}]\n```",
        )]));

        let files = agent(model.clone()).scaffold("a login form").await.unwrap();
        assert_eq!(files[0].path, "src/Login.tsx");
        assert!(model.requests.lock()[0].response_schema.is_some());
    }

    #[tokio::test]
    async fn test_scaffold_invalid_json() {
        let model = Arc::new(ScriptedModel::replying(vec![Ok("not json")]));

        let err = agent(model).scaffold("anything").await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidStructure(_)));
    }

    #[tokio::test]
    async fn test_provider_errors_and_empty_input() {
        let model = Arc::new(ScriptedModel::replying(vec![Err("gemini error: 429")]));
        let agent = agent(model.clone());

        let err = agent.analyze("code").await.unwrap_err();
        assert!(matches!(err, AgentError::Provider(_)));
        assert!(err.to_string().contains("429"));

        assert!(matches!(agent.analyze("   ").await, Err(AgentError::EmptyInput)));
        assert_eq!(model.requests.lock().len(), 1);
    }
}
