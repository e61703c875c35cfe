//! Prompt assembly for the triage and reply endpoints.
//!
//! Both builders are pure: the same request always yields the same prompt.

use faxdesk_core::{
    FaxMessage, Prompt, PromptMessage, ReplyAction, ReplyDecision, SamplingParameters,
};

use crate::policy::{
    ACKNOWLEDGE_INSTRUCTION, ANALYZE_POLICY, APPROVE_INSTRUCTION, CUSTOM_INSTRUCTION_PREFIX,
    CUSTOM_INSTRUCTION_SUFFIX, DENY_INSTRUCTION, REPLY_POLICY, STOP_SEQUENCES,
};

const CONTEXT_WINDOW: u32 = 2048;
const TOP_P: f32 = 0.9;

/// Triage wants a short, repeatable answer.
pub fn analyze_sampling() -> SamplingParameters {
    SamplingParameters {
        temperature: 0.1,
        max_output_tokens: 150,
        context_window: CONTEXT_WINDOW,
        top_p: TOP_P,
        stop_sequences: stop_sequences(),
    }
}

/// Replies get more room and more varied prose.
pub fn reply_sampling() -> SamplingParameters {
    SamplingParameters {
        temperature: 0.8,
        max_output_tokens: 400,
        context_window: CONTEXT_WINDOW,
        top_p: TOP_P,
        stop_sequences: stop_sequences(),
    }
}

fn stop_sequences() -> Vec<String> {
    STOP_SEQUENCES.iter().map(|s| s.to_string()).collect()
}

pub fn build_analyze_prompt(fax: &FaxMessage) -> Prompt {
    let user = format!(
        "Sender: {sender}\n\
         Subject: {title}\n\
         Message: \"{content}\"",
        sender = fax.sender,
        title = fax.title,
        content = fax.content,
    );

    Prompt {
        messages: vec![
            PromptMessage::system(ANALYZE_POLICY.text),
            PromptMessage::user(user),
        ],
        sampling: analyze_sampling(),
    }
}

/// Select the instruction block for an administrative decision.
pub fn reply_instruction(decision: &ReplyDecision) -> String {
    match decision.action {
        ReplyAction::Approve => APPROVE_INSTRUCTION.to_string(),
        ReplyAction::Deny => DENY_INSTRUCTION.to_string(),
        ReplyAction::Custom => format!(
            "{CUSTOM_INSTRUCTION_PREFIX}{note}{CUSTOM_INSTRUCTION_SUFFIX}",
            note = decision.note()
        ),
        ReplyAction::Unknown => ACKNOWLEDGE_INSTRUCTION.to_string(),
    }
}

pub fn build_reply_prompt(decision: &ReplyDecision) -> Prompt {
    let system = format!(
        "{policy}\n\nCOMMAND:\n{instruction}",
        policy = REPLY_POLICY.text,
        instruction = reply_instruction(decision),
    );

    let fax = &decision.original;
    let user = format!(
        "Original Fax from: {sender}\n\
         Subject: {title}\n\
         Message: \"{content}\"\n\
         \n\
         Write the reply:",
        sender = fax.sender,
        title = fax.title,
        content = fax.content,
    );

    Prompt {
        messages: vec![PromptMessage::system(system), PromptMessage::user(user)],
        sampling: reply_sampling(),
    }
}
