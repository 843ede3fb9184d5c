//! Helm rules
//!
//! Scoped to chart development: local rendering and validation are prompted,
//! anything that deploys to or mutates a cluster is blocked and belongs in
//! GitOps (ArgoCD, Flux) or PR-driven CI/CD.

use crate::rules::{FlagGap, Rule, ToolProfile};

/// Blocked helm subcommands
pub const RULES: &[Rule] = &[
    Rule::new("helm-install", "install", "helm install"),
    Rule::new("helm-upgrade", "upgrade", "helm upgrade"),
    Rule::new("helm-uninstall", "uninstall", "helm uninstall"),
    Rule::new("helm-delete", "delete", "helm delete"),
    Rule::new("helm-rollback", "rollback", "helm rollback"),
    Rule::new("helm-test", "test", "helm test"),
];

/// `test` is too common a word to escalate on
pub const KEYWORDS: &[&str] = &["install", "upgrade", "uninstall", "delete", "rollback"];

pub static PROFILE: ToolProfile = ToolProfile {
    id: "helm",
    display_name: "Helm",
    invocation_names: &["helm"],
    flag_gap: FlagGap::SpaceSeparated,
    rules: RULES,
    keywords: KEYWORDS,
    impact: "This command deploys to or mutates a cluster and must go through \
             your GitOps workflow (ArgoCD, Flux, or PR-driven CI/CD).",
    local_alternatives: &[
        ("helm template <chart>", "Render templates locally"),
        ("helm lint <chart>", "Validate chart structure"),
    ],
    rotate_daily: true,
};
