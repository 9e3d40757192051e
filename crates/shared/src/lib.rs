pub mod data_url;
pub mod entry;
pub mod error;
pub mod scaffold;
pub mod tree;
pub mod workspace;

pub use entry::{Entry, EntryKind, EntryType};
pub use error::{DataUrlError, WorkspaceError};
pub use tree::{build_tree, TreeNode};
pub use workspace::{NewEntryKind, UploadOutcome, Workspace};

pub mod settings {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ProviderAuth {
        pub api_key: Option<String>,
    }

    /// Which Gemini model handles which job.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ModelSettings {
        pub chat_model: String,     // conversational, e.g. "gemini-2.5-flash"
        pub analyze_model: String,  // quick overview, e.g. "gemini-2.5-flash-lite"
        pub refactor_model: String, // heavy lifting, e.g. "gemini-2.5-pro"
        pub scaffold_model: String,
        /// Thinking budget (tokens) for refactoring
        pub refactor_thinking_budget: u32,
        pub gemini_auth: ProviderAuth,
        /// Override for the Generative Language API endpoint
        #[serde(default)]
        pub api_base_url: Option<String>,
        #[serde(default = "default_timeout_secs")]
        pub request_timeout_secs: u64,
    }

    fn default_timeout_secs() -> u64 {
        180
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AppSettings {
        pub model: ModelSettings,
        #[serde(default)]
        pub dark_mode: bool,
    }

    impl Default for ModelSettings {
        fn default() -> Self {
            Self {
                chat_model: "gemini-2.5-flash".into(),
                analyze_model: "gemini-2.5-flash-lite".into(),
                refactor_model: "gemini-2.5-pro".into(),
                scaffold_model: "gemini-2.5-pro".into(),
                refactor_thinking_budget: 32_768,
                gemini_auth: ProviderAuth::default(),
                api_base_url: None,
                request_timeout_secs: default_timeout_secs(),
            }
        }
    }

    impl Default for AppSettings {
        fn default() -> Self {
            Self {
                model: ModelSettings::default(),
                dark_mode: true,
            }
        }
    }
}

pub mod agent_api {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ChatRole {
        User,
        Model,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ChatMessage {
        pub role: ChatRole,
        pub content: String,
    }

    impl ChatMessage {
        pub fn user(content: impl Into<String>) -> Self {
            Self {
                role: ChatRole::User,
                content: content.into(),
            }
        }

        pub fn model(content: impl Into<String>) -> Self {
            Self {
                role: ChatRole::Model,
                content: content.into(),
            }
        }
    }

    /// Editor actions that send the active file to the model.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum AiMode {
        Analyze,
        Refactor,
    }

    impl AiMode {
        pub fn label(&self) -> &'static str {
            match self {
                AiMode::Analyze => "Analyze",
                AiMode::Refactor => "Refactor",
            }
        }

        pub fn slug(&self) -> &'static str {
            match self {
                AiMode::Analyze => "analyze",
                AiMode::Refactor => "refactor",
            }
        }
    }
}
