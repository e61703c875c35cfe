//! Fax records exchanged with the game server.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fax submitted by a player in-game.
///
/// Missing fields decode as empty strings; the game server is not strict
/// about which keys it sends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaxMessage {
    pub sender: String,
    pub title: String,
    pub content: String,
}

/// Triage classification of a fax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Parse the value a model wrote after `Urgency:`.
    ///
    /// Case-insensitive; tolerates decoration such as `[High]`, `**HIGH**`
    /// or `high.`. Returns `None` for anything else.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let word = s.trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, '[' | ']' | '"' | '\'' | '*' | '(' | ')' | '.')
        });
        match word.to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage answer returned for `/fax/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub urgency: Urgency,
    pub latency_ms: u64,
}

/// What the administrator decided to do with a fax.
///
/// Decoded from a free-form string: anything that is not `approve`, `deny`
/// or `custom` becomes [`ReplyAction::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ReplyAction {
    Approve,
    Deny,
    Custom,
    #[default]
    Unknown,
}

impl From<String> for ReplyAction {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&str> for ReplyAction {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Self::Approve,
            "deny" => Self::Deny,
            "custom" => Self::Custom,
            _ => Self::Unknown,
        }
    }
}

/// Administrative decision on a fax, input for `/fax/reply`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyDecision {
    #[serde(rename = "original_fax")]
    pub original: FaxMessage,
    pub action: ReplyAction,
    /// Administrator's own wording; only used when `action` is `custom`.
    pub custom_note: Option<String>,
}

impl ReplyDecision {
    /// The note to rewrite, empty when none was supplied.
    pub fn note(&self) -> &str {
        self.custom_note.as_deref().unwrap_or_default()
    }
}

/// Drafted in-character reply returned for `/fax/reply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyDraft {
    #[serde(rename = "draft")]
    pub text: String,
    pub latency_ms: u64,
}
