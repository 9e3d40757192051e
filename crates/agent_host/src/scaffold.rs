//! Parsing of structured scaffold responses.

use crate::error::AgentError;
use regex::Regex;
use shared::scaffold::ScaffoldFile;
use std::sync::OnceLock;

static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Drop a surrounding Markdown code fence (```` ```json ... ``` ````) if present.
fn strip_code_fence(text: &str) -> &str {
    let re = FENCE_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").expect("fence regex is valid")
    });
    let trimmed = text.trim();
    match re.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => trimmed,
    }
}

/// Parse the model's JSON answer into scaffold files.
///
/// The model is asked for bare JSON but sometimes wraps it in a code fence.
pub fn parse_scaffold_response(text: &str) -> Result<Vec<ScaffoldFile>, AgentError> {
    let json = strip_code_fence(text);
    serde_json::from_str::<Vec<ScaffoldFile>>(json).map_err(|e| {
        tracing::error!(error = %e, response = %text, "Failed to parse scaffold response");
        AgentError::InvalidStructure(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_json() {
        let files = parse_scaffold_response(
            r#"[{"path": "src/App.tsx", "content": "export default function App() {}"}]"#,
        )
        .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/App.tsx");
    }

    #[test]
    fn test_parse_fenced_json() {
        let response = "```json\n[\n  {\"path\": \"a.md\", \"content\": \"# A\"},\n  {\"path\": \"b/c.js\", \"content\": \"\"}\n]\n```";
        let files = parse_scaffold_response(response).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[1].path, "b/c.js");
    }

    #[test]
    fn test_fence_inside_content_is_kept() {
        let response = r#"[{"path": "README.md", "content": "```sh\nnpm i\n```"}]"#;
        let files = parse_scaffold_response(response).unwrap();

        assert_eq!(files[0].content, "```sh\nnpm i\n```");
    }

    #[test]
    fn test_invalid_structure() {
        let err = parse_scaffold_response("Sure! Here are your files: ...").unwrap_err();
        assert!(matches!(err, AgentError::InvalidStructure(_)));
        assert!(err.to_string().starts_with("AI returned an invalid structure"));

        let err = parse_scaffold_response(r#"[{"path": "missing-content.js"}]"#).unwrap_err();
        assert!(matches!(err, AgentError::InvalidStructure(_)));
    }
}
