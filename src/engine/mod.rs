//! Policy engine for infra-guardrails
//!
//! One engine governs one tool. Classification runs in four steps:
//!
//! 1. Relevance: the command must name the tool as a whole word, otherwise
//!    it is allowed untouched.
//! 2. Rules: a blocked subcommand after the tool name (and any global flags)
//!    denies the command.
//! 3. Keywords: a blocked subcommand name anywhere else, as a whole word,
//!    turns the prompt into a warning.
//! 4. Everything else is a routine approval prompt.

pub mod reason;

use regex::{Regex, RegexSet};

use crate::audit::{AuditDecision, AuditEntry, AuditLog};
use crate::config::{Config, Environment};
use crate::input::ToolResponse;
use crate::output::Decision;
use crate::parser::shell;
use crate::rules::{Rule, Tool, ToolProfile};

/// The tool name must begin a shell token, so `main.tf` is not an invocation
const INVOCATION_START: &str = r#"(?:^|[\s/;&|(){}=`"'\\!])"#;

/// Matches a blocked subcommand as a whole word not followed by `=`
const SUBCOMMAND_END: &str = r"(?:[^\w=]|$)";

/// Result of a finished command, as reported by the host
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub success: bool,
    pub exit_code: serde_json::Value,
    pub user_approved: bool,
}

impl From<&ToolResponse> for Outcome {
    fn from(response: &ToolResponse) -> Self {
        Self {
            success: response.success,
            exit_code: response.exit_code(),
            user_approved: response.user_approved(),
        }
    }
}

/// The policy evaluator for one governed tool
pub struct PolicyEngine {
    profile: &'static ToolProfile,
    invocation: Regex,
    rules: RegexSet,
    keywords: RegexSet,
    container_notice: bool,
}

impl PolicyEngine {
    /// Compile the policy for `tool`, including any configured aliases
    pub fn new(tool: Tool, config: &Config, environment: &Environment) -> Result<Self, regex::Error> {
        let profile = tool.profile();

        let names: Vec<String> = profile
            .invocation_names
            .iter()
            .map(|n| regex::escape(n))
            .chain(config.tool(tool).aliases.iter().map(|a| regex::escape(a)))
            .collect();
        let names = names.join("|");

        let invocation = Regex::new(&format!(r"(?i){}(?:{})\b", INVOCATION_START, names))?;

        let rule_patterns: Vec<String> = profile
            .rules
            .iter()
            .map(|rule| {
                format!(
                    r"(?i){}(?:{}){}(?:{}){}",
                    INVOCATION_START,
                    names,
                    profile.flag_gap.pattern(),
                    rule.subcommand,
                    SUBCOMMAND_END
                )
            })
            .collect();
        let rules = RegexSet::new(&rule_patterns)?;

        let keyword_patterns: Vec<String> = profile
            .keywords
            .iter()
            .map(|kw| format!(r"(?i)\b{}\b", regex::escape(kw)))
            .collect();
        let keywords = RegexSet::new(&keyword_patterns)?;

        Ok(Self {
            profile,
            invocation,
            rules,
            keywords,
            container_notice: config.general.container_notice && !environment.in_container,
        })
    }

    /// Engine with default configuration
    pub fn with_defaults(tool: Tool, environment: &Environment) -> Result<Self, regex::Error> {
        Self::new(tool, &Config::default(), environment)
    }

    /// The policy profile in use
    pub fn profile(&self) -> &'static ToolProfile {
        self.profile
    }

    /// Does the command invoke the governed tool at all
    pub fn is_governed(&self, command: &str) -> bool {
        self.invocation.is_match(command)
    }

    /// First rule matching any top-level segment of the command
    pub fn matched_rule(&self, command: &str) -> Option<&'static Rule> {
        let rules = self.profile.rules;
        shell::split_compound_command(command)
            .into_iter()
            .find_map(|segment| self.rules.matches(segment).iter().next())
            .map(|idx| &rules[idx])
    }

    /// Blocked subcommand names appearing anywhere as whole words
    pub fn matched_keywords(&self, command: &str) -> Vec<String> {
        self.keywords
            .matches(command)
            .iter()
            .map(|idx| self.profile.keywords[idx].to_string())
            .collect()
    }

    /// Classify a command without side effects
    pub fn classify(&self, command: &str, working_dir: &str) -> Decision {
        if !self.is_governed(command) {
            return Decision::Allow;
        }

        if let Some(rule) = self.matched_rule(command) {
            return Decision::deny(rule.id, reason::blocked(self.profile, rule, working_dir));
        }

        let keywords = self.matched_keywords(command);
        let decision = if keywords.is_empty() {
            Decision::ask(reason::routine(self.profile, command, working_dir))
        } else {
            let text = reason::suspicious(&keywords, command, working_dir);
            Decision::suspicious(keywords, text)
        };

        if self.container_notice {
            self.with_container_notice(decision)
        } else {
            decision
        }
    }

    fn with_container_notice(&self, decision: Decision) -> Decision {
        match decision {
            Decision::Ask { reason: text } => Decision::ask(text + &reason::container_notice()),
            Decision::Suspicious { keywords, reason: text } => {
                Decision::suspicious(keywords, text + &reason::container_notice())
            }
            other => other,
        }
    }

    /// Classify a command and record the decision.
    ///
    /// Deny and ask write one audit record; allow writes nothing. A failed
    /// write is reported on stderr and does not change the decision.
    pub fn evaluate(&self, command: &str, working_dir: &str, audit: &mut AuditLog) -> Decision {
        let decision = self.classify(command, working_dir);

        if let Some(label) = decision.audit_decision() {
            let entry = AuditEntry::decision(
                command,
                label,
                working_dir,
                reason::audit_reason(self.profile, &decision),
            );
            if let Err(e) = audit.append(&entry) {
                eprintln!("Warning: Could not write to audit log: {}", e);
            }
        }

        decision
    }

    /// Record the result of a finished command.
    ///
    /// Returns the label written, or `None` when the command does not
    /// involve the governed tool.
    pub fn record_completion(
        &self,
        command: &str,
        working_dir: &str,
        outcome: &Outcome,
        audit: &mut AuditLog,
    ) -> Option<AuditDecision> {
        if !self.is_governed(command) {
            return None;
        }

        let entry = AuditEntry::completion(
            command,
            working_dir,
            outcome.exit_code.clone(),
            outcome.success,
            outcome.user_approved,
        );
        if let Err(e) = audit.append(&entry) {
            eprintln!("Warning: Could not write to audit log: {}", e);
        }
        Some(entry.audit_decision())
    }
}
