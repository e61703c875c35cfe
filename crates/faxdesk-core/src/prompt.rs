//! Chat-completion prompt types shared by the prompt builder and inference client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message. Order within a prompt is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Generation controls sent alongside a prompt.
///
/// `temperature` is expected in `[0, 1]`, `top_p` in `(0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParameters {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub context_window: u32,
    pub top_p: f32,
    pub stop_sequences: Vec<String>,
}

/// A complete prompt: system message(s) first, then exactly one user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub messages: Vec<PromptMessage>,
    pub sampling: SamplingParameters,
}

impl Prompt {
    /// Concatenated content of all system messages.
    pub fn system_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Content of the last user message, empty if there is none.
    pub fn user_text(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serialises_lowercase() {
        let msg = PromptMessage::system("policy");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"policy"}"#);
    }

    #[test]
    fn prompt_accessors() {
        let prompt = Prompt {
            messages: vec![PromptMessage::system("rules"), PromptMessage::user("fax")],
            sampling: SamplingParameters {
                temperature: 0.1,
                max_output_tokens: 150,
                context_window: 2048,
                top_p: 0.9,
                stop_sequences: vec![],
            },
        };
        assert_eq!(prompt.system_text(), "rules");
        assert_eq!(prompt.user_text(), "fax");
    }
}
