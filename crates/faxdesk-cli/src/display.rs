//! Plain-text rendering of assembled prompts for policy review.

use std::fmt::Write;

use faxdesk_core::{Prompt, Role};

const RULE_WIDTH: usize = 60;

fn heading(out: &mut String, title: &str) {
    let pad = RULE_WIDTH.saturating_sub(title.len() + 4);
    let _ = writeln!(out, "── {title} {}", "─".repeat(pad));
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
    }
}

/// Render every message in order, followed by the sampling parameters.
pub fn render_prompt(prompt: &Prompt) -> String {
    let mut out = String::new();

    for (i, msg) in prompt.messages.iter().enumerate() {
        heading(&mut out, &format!("{} #{}", role_label(msg.role), i + 1));
        let _ = writeln!(out, "{}", msg.content.trim_end());
        out.push('\n');
    }

    let s = &prompt.sampling;
    heading(&mut out, "sampling");
    let _ = writeln!(out, "  temperature        {}", s.temperature);
    let _ = writeln!(out, "  max_output_tokens  {}", s.max_output_tokens);
    let _ = writeln!(out, "  context_window     {}", s.context_window);
    let _ = writeln!(out, "  top_p              {}", s.top_p);
    let _ = writeln!(out, "  stop               {:?}", s.stop_sequences);
    out
}
