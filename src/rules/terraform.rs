//! Terraform rules
//!
//! Blocks commands that change real infrastructure or its state file.
//! Everything else (plan, init, fmt, validate, state list, ...) goes to a
//! routine approval prompt.

use crate::rules::{FlagGap, Rule, ToolProfile};

/// Blocked terraform subcommands
pub const RULES: &[Rule] = &[
    Rule::new("terraform-apply", "apply", "terraform apply"),
    Rule::new("terraform-destroy", "destroy", "terraform destroy"),
    Rule::new("terraform-import", "import", "terraform import"),
    Rule::new(
        "terraform-state-mutation",
        r"state\s+(?:rm|mv|push|pull)",
        "terraform state manipulation (rm/mv/push/pull)",
    ),
    Rule::new("terraform-taint", "taint", "terraform taint"),
    Rule::new("terraform-untaint", "untaint", "terraform untaint"),
    Rule::new("terraform-force-unlock", "force-unlock", "terraform force-unlock"),
];

/// `state` is left out so `terraform state list` stays a routine prompt
pub const KEYWORDS: &[&str] = &["apply", "destroy", "import", "taint", "untaint", "force-unlock"];

pub static PROFILE: ToolProfile = ToolProfile {
    id: "terraform",
    display_name: "Terraform",
    // Shell aliases never reach a subprocess; these cover the binary and
    // common wrapper scripts on PATH.
    invocation_names: &["terraform", "tf", "tform"],
    flag_gap: FlagGap::EqualsJoined,
    rules: RULES,
    keywords: KEYWORDS,
    impact: "This command can modify infrastructure state and must go through \
             your standard PR review workflow.",
    local_alternatives: &[
        ("terraform plan", "Preview changes"),
        ("terraform validate", "Check configuration"),
        ("terraform fmt", "Format files"),
    ],
    rotate_daily: false,
};
