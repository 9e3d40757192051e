//! Prompts and schemas sent to the model for each editor action.

use serde_json::{json, Value};

/// System instruction for the chat panel.
pub const VIBE_BOT_SYSTEM_PROMPT: &str = "You are Vibe Bot, a helpful and friendly AI assistant for developers. \
You are integrated into a code editor called Vibe Code. Be concise and helpful.";

/// Quick, high-level overview of a snippet.
pub fn analyze_prompt(code: &str) -> String {
    format!(
        r#"Analyze the following code snippet. Provide a brief, high-level overview of what it does, its purpose, and any potential improvements. Format the response in markdown.

--- CODE ---
{code}
--- END CODE ---
"#
    )
}

/// Full refactor; the model should answer with a single code block.
pub fn refactor_prompt(code: &str) -> String {
    format!(
        r#"You are an expert software engineer. Refactor the following code snippet. Your goal is to improve its readability, efficiency, and adherence to best practices. Provide only the refactored code in a single code block, with brief comments explaining the major changes.

--- CODE TO REFACTOR ---
{code}
--- END CODE ---
"#
    )
}

/// File-and-folder scaffolding from a free-form request.
pub fn scaffold_prompt(request: &str) -> String {
    format!(
        r#"You are an expert software architect. Based on the user's request, generate a list of files and their content to scaffold a new feature or project.
- Create a logical file and folder structure.
- Provide complete, high-quality code for each file.
- The user is working in a React/TypeScript environment. Assume standard tools like Vite or Create React App are in use.
- The file paths should be relative, e.g., "src/components/Button.tsx".
- Respond ONLY with the JSON object that adheres to the provided schema.

USER REQUEST:
---
{request}
---
"#
    )
}

/// Response schema for scaffolding: an array of `{ path, content }`.
pub fn scaffold_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "path": {
                    "type": "STRING",
                    "description": "The relative path of the file, including the filename. E.g., \"src/components/UserProfile/UserProfile.tsx\"."
                },
                "content": {
                    "type": "STRING",
                    "description": "The complete code or text content for the file."
                }
            },
            "required": ["path", "content"]
        }
    })
}
