//! Output formatting for Claude Code hook responses
//!
//! Produces the JSON output format expected by Claude Code hooks.

use serde::Serialize;

use crate::audit::AuditDecision;

/// Main output structure for Claude Code hooks
#[derive(Debug, Serialize)]
pub struct HookOutput {
    /// Hook-specific output containing the permission decision
    #[serde(rename = "hookSpecificOutput")]
    pub hook_specific_output: HookSpecificOutput,
}

/// Hook-specific output with permission decision
#[derive(Debug, Serialize)]
pub struct HookSpecificOutput {
    /// The hook event name (always "PreToolUse")
    #[serde(rename = "hookEventName")]
    pub hook_event_name: String,

    /// Permission decision: "allow", "ask" or "deny"
    #[serde(rename = "permissionDecision")]
    pub permission_decision: Permission,

    /// Explanation shown to the user (empty for allow)
    #[serde(rename = "permissionDecisionReason")]
    pub permission_decision_reason: String,
}

/// The three answers a PreToolUse hook can give
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Allow,
    Ask,
    Deny,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Allow => "allow",
            Permission::Ask => "ask",
            Permission::Deny => "deny",
        }
    }
}

/// Decision result from the policy engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Not a command for the governed tool
    Allow,

    /// Routine approval prompt for a safe command
    Ask { reason: String },

    /// Approval prompt for a command that mentions blocked operations in a
    /// form the rules could not verify
    Suspicious {
        keywords: Vec<String>,
        reason: String,
    },

    /// A blocked operation; hard stop
    Deny { rule_id: String, reason: String },
}

impl Decision {
    /// Create a routine ask decision
    pub fn ask(reason: impl Into<String>) -> Self {
        Decision::Ask {
            reason: reason.into(),
        }
    }

    /// Create a suspicious ask decision
    pub fn suspicious(keywords: Vec<String>, reason: impl Into<String>) -> Self {
        Decision::Suspicious {
            keywords,
            reason: reason.into(),
        }
    }

    /// Create a deny decision
    pub fn deny(rule_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Decision::Deny {
            rule_id: rule_id.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is an allow decision
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Check if this asks the user, routine or suspicious
    pub fn is_ask(&self) -> bool {
        matches!(self, Decision::Ask { .. } | Decision::Suspicious { .. })
    }

    /// Check if this is a suspicious ask
    pub fn is_suspicious(&self) -> bool {
        matches!(self, Decision::Suspicious { .. })
    }

    /// Check if this is a deny decision
    pub fn is_deny(&self) -> bool {
        matches!(self, Decision::Deny { .. })
    }

    /// Deny is the only hard block
    pub fn hard_block(&self) -> bool {
        self.is_deny()
    }

    /// The permission reported to the host
    pub fn permission(&self) -> Permission {
        match self {
            Decision::Allow => Permission::Allow,
            Decision::Ask { .. } | Decision::Suspicious { .. } => Permission::Ask,
            Decision::Deny { .. } => Permission::Deny,
        }
    }

    /// Get the rule ID if applicable
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            Decision::Deny { rule_id, .. } => Some(rule_id),
            _ => None,
        }
    }

    /// Get the reason
    pub fn reason(&self) -> &str {
        match self {
            Decision::Allow => "",
            Decision::Ask { reason } => reason,
            Decision::Suspicious { reason, .. } => reason,
            Decision::Deny { reason, .. } => reason,
        }
    }

    /// Audit label for this decision; allow is not audited
    pub fn audit_decision(&self) -> Option<AuditDecision> {
        match self {
            Decision::Allow => None,
            Decision::Ask { .. } => Some(AuditDecision::PendingApproval),
            Decision::Suspicious { .. } => Some(AuditDecision::PendingApprovalSuspicious),
            Decision::Deny { .. } => Some(AuditDecision::Blocked),
        }
    }

    /// Process exit code for the validator hook
    pub fn exit_code(&self) -> i32 {
        if self.hard_block() {
            2
        } else {
            0
        }
    }

    /// Split into the `(decision, rationale, hard_block)` triple
    pub fn into_parts(self) -> (Permission, String, bool) {
        let permission = self.permission();
        let hard_block = self.hard_block();
        let reason = match self {
            Decision::Allow => String::new(),
            Decision::Ask { reason }
            | Decision::Suspicious { reason, .. }
            | Decision::Deny { reason, .. } => reason,
        };
        (permission, reason, hard_block)
    }
}

impl HookOutput {
    /// Create output from a Decision
    pub fn from_decision(decision: &Decision) -> Self {
        HookOutput {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: "PreToolUse".to_string(),
                permission_decision: decision.permission(),
                permission_decision_reason: decision.reason().to_string(),
            },
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
