pub mod extract;
pub mod fax;
pub mod prompt;

pub use extract::{clean_output, extract_field};
pub use fax::{AnalysisResult, FaxMessage, ReplyAction, ReplyDecision, ReplyDraft, Urgency};
pub use prompt::{Prompt, PromptMessage, Role, SamplingParameters};
