//! User-facing rationales and audit reasons

use crate::config::CONTAINER_VAR;
use crate::output::Decision;
use crate::rules::{Rule, ToolProfile};

/// Rationale for a blocked command
pub fn blocked(profile: &ToolProfile, rule: &Rule, working_dir: &str) -> String {
    let mut reason = format!(
        "BLOCKED: {} is not allowed.\n\n{}\n\nFor local development, use:\n",
        rule.label, profile.impact
    );
    for (command, description) in profile.local_alternatives {
        reason.push_str(&format!("  {:<24} # {}\n", command, description));
    }
    reason.push_str(&format!("\nWorking directory: {}", working_dir));
    reason
}

/// Rationale for a command that mentions blocked operations indirectly
pub fn suspicious(keywords: &[String], command: &str, working_dir: &str) -> String {
    format!(
        "WARNING: Command references blocked operation ({}) but in a form\n\
         that could not be automatically verified.\n\n  \
         Command: {}\n  \
         Working directory: {}\n\n\
         This may be using variables, command substitution, eval, or other\n\
         indirection to run a blocked operation. Review the full command carefully before approving.",
        keywords.join(", "),
        command,
        working_dir
    )
}

/// Rationale for a routine approval prompt
pub fn routine(profile: &ToolProfile, command: &str, working_dir: &str) -> String {
    format!(
        "{} command requires approval:\n\n  \
         Command: {}\n  \
         Working directory: {}\n\n\
         This prompt ensures you review each {} operation before execution.",
        profile.display_name, command, working_dir, profile.id
    )
}

/// Advisory appended to approval prompts outside the dev container
pub fn container_notice() -> String {
    format!(
        "\n\nNOTE: This session is not running inside the standardized dev container \
         ({} is not \"true\"). Tool versions and credentials may differ from CI.",
        CONTAINER_VAR
    )
}

/// Short reason stored in the audit record
pub fn audit_reason(profile: &ToolProfile, decision: &Decision) -> String {
    match decision {
        Decision::Allow => String::new(),
        Decision::Deny { rule_id, .. } => {
            let label = profile
                .rules
                .iter()
                .find(|r| r.id == rule_id.as_str())
                .map(|r| r.label)
                .unwrap_or(rule_id.as_str());
            format!("Blocked: {}", label)
        }
        Decision::Suspicious { keywords, .. } => {
            format!("Contains blocked keywords: {}", keywords.join(", "))
        }
        Decision::Ask { .. } => "Awaiting user approval".to_string(),
    }
}
