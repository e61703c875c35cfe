//! Per-endpoint composition: build prompt, call the model, shape the result.

use std::sync::Arc;
use std::time::Instant;

use faxdesk_core::{AnalysisResult, FaxMessage, Prompt, ReplyDecision, ReplyDraft};
use tracing::info;

use crate::client::{ChatBackend, InferenceError};
use crate::policy::{ANALYZE_POLICY, REPLY_POLICY};
use crate::prompts::{build_analyze_prompt, build_reply_prompt};

/// Stateless fax pipeline. Each call builds its own prompt and makes a
/// single inference call; only the backend is shared.
#[derive(Clone)]
pub struct Pipeline {
    backend: Arc<dyn ChatBackend>,
}

impl Pipeline {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Triage a fax into a summary and urgency.
    pub async fn analyze(&self, fax: &FaxMessage) -> Result<AnalysisResult, InferenceError> {
        let prompt = build_analyze_prompt(fax);
        let (raw, latency_ms) = self.timed_invoke(&prompt).await?;

        let result = AnalysisResult::from_model_output(&raw, latency_ms);
        info!(
            sender = %fax.sender,
            policy = %ANALYZE_POLICY.label(),
            urgency = %result.urgency,
            latency_ms,
            "fax analysed"
        );
        Ok(result)
    }

    /// Draft an in-character reply. The cleaned model text is the draft.
    pub async fn reply(&self, decision: &ReplyDecision) -> Result<ReplyDraft, InferenceError> {
        let prompt = build_reply_prompt(decision);
        let (text, latency_ms) = self.timed_invoke(&prompt).await?;

        info!(
            action = ?decision.action,
            policy = %REPLY_POLICY.label(),
            chars = text.chars().count(),
            latency_ms,
            "reply drafted"
        );
        Ok(ReplyDraft { text, latency_ms })
    }

    /// Run the inference call, timing only the call itself.
    async fn timed_invoke(&self, prompt: &Prompt) -> Result<(String, u64), InferenceError> {
        let start = Instant::now();
        let text = self
            .backend
            .invoke(&prompt.messages, &prompt.sampling)
            .await?;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        Ok((text, latency_ms))
    }
}
