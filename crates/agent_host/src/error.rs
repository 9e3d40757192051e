/// Errors from AI actions.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Transport, auth or provider-side failure
    #[error("AI request failed: {0}")]
    Provider(#[from] anyhow::Error),

    #[error("AI returned an invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Nothing to send")]
    EmptyInput,
}
