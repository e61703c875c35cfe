//! Tolerant extraction of structured fields from free-form model output.
//!
//! Small local models do not reliably follow an output format, so nothing
//! here fails: missing or malformed fields degrade to documented fallbacks.
//!
//! Expected analysis output:
//!
//! ```text
//! Summary: <one sentence>
//! Urgency: <Low|Medium|High>
//! ```

use crate::fax::{AnalysisResult, Urgency};

pub const SUMMARY_LABEL: &str = "Summary:";
pub const URGENCY_LABEL: &str = "Urgency:";

/// Return the text after `label` on the first line whose trimmed form starts
/// with it, trimmed. Empty when no line carries the label.
pub fn extract_field<'a>(text: &'a str, label: &str) -> &'a str {
    text.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(label))
        .map(str::trim)
        .unwrap_or_default()
}

/// Trim whitespace and strip one enclosing pair of double quotes.
///
/// `"Hello"` becomes `Hello`; `""Hello""` becomes `"Hello"`.
pub fn clean_output(s: &str) -> &str {
    let s = s.trim();
    if s.len() > 1
        && let Some(inner) = s.strip_prefix('"').and_then(|rest| rest.strip_suffix('"'))
    {
        return inner;
    }
    s
}

impl AnalysisResult {
    /// Shape raw model text into a triage result.
    ///
    /// Without a `Summary:` line the whole text becomes the summary; an
    /// absent or unrecognised `Urgency:` value becomes [`Urgency::Low`].
    pub fn from_model_output(raw: &str, latency_ms: u64) -> Self {
        let summary = match extract_field(raw, SUMMARY_LABEL) {
            "" => raw.to_string(),
            s => s.to_string(),
        };

        let urgency_field = extract_field(raw, URGENCY_LABEL);
        let urgency = Urgency::parse_lenient(urgency_field).unwrap_or_else(|| {
            tracing::debug!(value = %urgency_field, "urgency not recognised, defaulting to Low");
            Urgency::Low
        });

        Self {
            summary,
            urgency,
            latency_ms,
        }
    }
}
