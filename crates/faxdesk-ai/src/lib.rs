//! Fax triage and reply generation on top of a local chat-completion model.

pub mod client;
pub mod pipeline;
pub mod policy;
pub mod prompts;

pub use client::{ChatBackend, InferenceError, OllamaClient, OllamaConfig};
pub use pipeline::Pipeline;
pub use prompts::{build_analyze_prompt, build_reply_prompt};
