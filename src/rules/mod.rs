//! Policy rules for infra-guardrails
//!
//! Each governed tool is described by a [`ToolProfile`]: the names it is
//! invoked under, how its global flags are written, the subcommands that are
//! blocked outright and the bare keywords that escalate to a suspicious prompt.

pub mod helm;
pub mod terraform;

/// A blocked subcommand of a governed tool
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique identifier for this rule
    pub id: &'static str,

    /// Regex fragment matching the subcommand (after the tool name and flags)
    pub subcommand: &'static str,

    /// Human-readable name of the blocked operation
    pub label: &'static str,
}

impl Rule {
    /// Create a new rule
    pub const fn new(id: &'static str, subcommand: &'static str, label: &'static str) -> Self {
        Self {
            id,
            subcommand,
            label,
        }
    }
}

/// How global flags sit between the tool name and its subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagGap {
    /// Flags may take their value as the next token (`--namespace prod`).
    /// Any tokens are skipped, lazily, until a blocked subcommand is reached.
    SpaceSeparated,

    /// Flags carry their value inline (`-chdir=../prod`).
    /// Only tokens starting with `-` are skipped; a quoted value may
    /// contain whitespace (`-chdir="../my env"`).
    EqualsJoined,
}

/// Whitespace between tokens, including a backslash-newline continuation
const TOKEN_SEPARATOR: &str = r"(?:\s|\\\n)+";

impl FlagGap {
    /// Regex fragment placed between the invocation name and the subcommand
    pub fn pattern(&self) -> String {
        match self {
            FlagGap::SpaceSeparated => format!(r"{sep}(?:\S+{sep})*?", sep = TOKEN_SEPARATOR),
            FlagGap::EqualsJoined => format!(
                r#"{sep}(?:-(?:"[^"]*"|'[^']*'|\S)+{sep})*?"#,
                sep = TOKEN_SEPARATOR
            ),
        }
    }
}

/// Declarative policy for one governed tool
#[derive(Debug)]
pub struct ToolProfile {
    /// Short identifier, also used for the audit file name
    pub id: &'static str,

    /// Name used in user-facing messages
    pub display_name: &'static str,

    /// Binary names and wrapper scripts that invoke the tool
    pub invocation_names: &'static [&'static str],

    /// Global flag syntax of the tool
    pub flag_gap: FlagGap,

    /// Blocked subcommands, evaluated in order
    pub rules: &'static [Rule],

    /// Bare subcommand names for the suspicious-keyword fallback
    pub keywords: &'static [&'static str],

    /// Why a blocked command must not run here
    pub impact: &'static str,

    /// Safe local commands suggested in place of a blocked one
    pub local_alternatives: &'static [(&'static str, &'static str)],

    /// Default for dated audit files
    pub rotate_daily: bool,
}

/// The governed tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Terraform,
    Helm,
}

impl Tool {
    /// All supported tools
    pub const ALL: [Tool; 2] = [Tool::Terraform, Tool::Helm];

    /// Policy profile for this tool
    pub fn profile(&self) -> &'static ToolProfile {
        match self {
            Tool::Terraform => &terraform::PROFILE,
            Tool::Helm => &helm::PROFILE,
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "terraform" | "tf" => Some(Tool::Terraform),
            "helm" => Some(Tool::Helm),
            _ => None,
        }
    }

    /// Identifier used in config sections and audit file names
    pub fn id(&self) -> &'static str {
        self.profile().id
    }
}
