//! infra-guardrails - Terraform and Helm guardrails for Claude Code
//!
//! This library backs a pair of Claude Code hooks that keep an assistant from
//! mutating real infrastructure. Blocked operations have to go through the
//! team's GitOps / PR review path instead.
//!
//! # Features
//!
//! - **Policy engine**: one evaluator, parameterized per tool
//! - **Flag-aware rules**: global flags between the tool and its subcommand
//!   do not hide a blocked operation
//! - **Keyword escalation**: indirect invocations (variables, `eval`) get a
//!   warning prompt instead of slipping through
//! - **Audit logging**: JSONL record of every governed command, before and
//!   after execution
//!
//! # Example
//!
//! ```
//! use infra_guardrails::{Environment, HookInput, PolicyEngine, Tool};
//!
//! let engine = PolicyEngine::with_defaults(Tool::Terraform, &Environment::new(".", true)).unwrap();
//!
//! let input = r#"{"tool_name":"Bash","tool_input":{"command":"terraform -chdir=prod apply"}}"#;
//! let hook_input = HookInput::from_json(input).unwrap();
//!
//! let decision = engine.classify(hook_input.command(), "/work/infra");
//! assert!(decision.is_deny());
//! assert!(decision.hard_block());
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod input;
pub mod output;
pub mod parser;
pub mod rules;

// Re-exports for convenience
pub use audit::{AuditDecision, AuditEntry, AuditLog};
pub use config::{Config, Environment};
pub use engine::{Outcome, PolicyEngine};
pub use input::HookInput;
pub use output::{Decision, HookOutput, Permission};
pub use rules::Tool;
