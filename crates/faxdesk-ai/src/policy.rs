//! Fixed prompt policy text.
//!
//! Everything the model is told about triage rules and reply tone lives
//! here as named, versioned data. The prompt builder only picks which block
//! to use and substitutes fax fields; it never branches on policy itself.

/// A named, versioned block of system-prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub name: &'static str,
    pub version: u32,
    pub text: &'static str,
}

impl Policy {
    /// `name@vN`, attached to log lines so outputs can be traced to the
    /// policy text that produced them.
    pub fn label(&self) -> String {
        format!("{}@v{}", self.name, self.version)
    }
}

// ── Triage ──

pub const ANALYZE_POLICY: Policy = Policy {
    name: "fax-triage",
    version: 1,
    text: "\
ROLE: Elite Nanotrasen Secretary.
TASK: Analyze incoming fax.
OUTPUT FORMAT:
Summary: [1 sentence summary in Russian]
Urgency: [Low/Medium/High]

URGENCY LOGIC (CRITICAL):
1. CHECK SENDER FIRST:
   - If Sender is \"Assistant\", \"Clown\", \"Mime\", or \"Unknown\" -> URGENCY IS ALWAYS LOW (unless confirmed by Heads of Staff).
   - If Sender is \"Captain\", \"HoS\", \"CMO\", \"CE\", \"RD\" -> Treat threats seriously.

2. CONTENT ANALYSIS:
   - \"Reptilians\", \"Changelings\", \"Vampires\" without photo/video evidence -> LOW (Paranoia).
   - \"Nuclear Operatives\", \"Blob\", \"Singularity\", \"Revolution\" -> HIGH (Only if from Command Staff).
   - \"Pizza\", \"Insults\", \"Jokes\" -> LOW.
   - \"Gun requests\", \"Access requests\" -> MEDIUM.
",
};

/// Senders whose faxes the triage policy always rates Low.
pub const LOW_TRUST_SENDERS: &[&str] = &["Assistant", "Clown", "Mime", "Unknown"];

/// Senders whose threat reports the triage policy takes seriously.
pub const COMMAND_SENDERS: &[&str] = &["Captain", "HoS", "CMO", "CE", "RD"];

// ── Reply ──

pub const REPLY_POLICY: Policy = Policy {
    name: "fax-reply",
    version: 1,
    text: "\
ROLE: Central Command Officer (Nanotrasen).
SETTING: Central Command, flagship Trurl
TASK: Write a formal reply fax based on the Administrator's decision.
LANGUAGE: Russian.
TONE: Bureaucratic, Official, Corporate.

CRITICAL RULES:
1. LENGTH: STRICTLY UNDER 150 WORDS. Be concise.
2. NO META-GAMING: Never mention \"Administrator\", \"Server\", or \"Player\". Refer to \"Central Command Directives\".
3. FORMAT: No headers. Only: Reply body + Signature.
",
};

pub const APPROVE_INSTRUCTION: &str =
    "DECISION: APPROVE. State that the request aligns with Nanotrasen Strategic Interests, etc.";

pub const DENY_INSTRUCTION: &str = "DECISION: DENY. Invent a bureaucratic excuse (e.g., Missing Form 27B-6, Budget Freeze, Low Social Credit).";

/// Wraps the administrator's note: `{PREFIX}{note}{SUFFIX}`.
pub const CUSTOM_INSTRUCTION_PREFIX: &str = "DECISION: The Central Command dictates: \"";
pub const CUSTOM_INSTRUCTION_SUFFIX: &str = "\".\nTASK: Rewrite this order into professional, threatening corporate language. Keep it direct.";

pub const ACKNOWLEDGE_INSTRUCTION: &str = "DECISION: Acknowledge receipt.";

/// Markers that mean the model has started writing the next conversation
/// turn itself. Generation stops at any of them.
pub const STOP_SEQUENCES: &[&str] = &["User:", "Sender:", "Original Fax:"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triage_policy_checks_sender_before_content() {
        let sender = ANALYZE_POLICY.text.find("CHECK SENDER FIRST").unwrap();
        let content = ANALYZE_POLICY.text.find("CONTENT ANALYSIS").unwrap();
        assert!(sender < content);
    }

    #[test]
    fn triage_policy_names_every_low_trust_sender() {
        for sender in LOW_TRUST_SENDERS {
            assert!(
                ANALYZE_POLICY.text.contains(&format!("\"{sender}\"")),
                "policy does not mention {sender}"
            );
        }
    }

    #[test]
    fn triage_policy_names_every_command_sender() {
        let rule = ANALYZE_POLICY
            .text
            .lines()
            .find(|l| l.contains("Treat threats seriously"))
            .unwrap();
        for sender in COMMAND_SENDERS {
            assert!(rule.contains(&format!("\"{sender}\"")), "rule does not mention {sender}");
        }
        for sender in LOW_TRUST_SENDERS {
            assert!(!COMMAND_SENDERS.contains(sender));
        }
    }

    #[test]
    fn reply_policy_forbids_meta_references() {
        assert!(REPLY_POLICY.text.contains("NO META-GAMING"));
        assert!(REPLY_POLICY.text.contains("UNDER 150 WORDS"));
    }

    #[test]
    fn policies_have_distinct_names() {
        assert_ne!(ANALYZE_POLICY.name, REPLY_POLICY.name);
    }

    #[test]
    fn label_carries_name_and_version() {
        assert_eq!(ANALYZE_POLICY.label(), "fax-triage@v1");
        assert_eq!(REPLY_POLICY.label(), "fax-reply@v1");
    }
}
