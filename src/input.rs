//! Input parsing for Claude Code hook JSON format
//!
//! Parses the JSON input from stdin that Claude Code sends to the PreToolUse
//! and PostToolUse hooks.

use serde::Deserialize;
use std::env;

/// Tool name of the host's shell-execution tool
pub const SHELL_TOOL: &str = "Bash";

/// Main input structure from Claude Code hooks
#[derive(Debug, Deserialize)]
pub struct HookInput {
    /// Name of the tool being invoked (e.g., "Bash", "Read", "Edit")
    #[serde(default)]
    pub tool_name: String,

    /// Tool-specific input parameters
    #[serde(default)]
    pub tool_input: ToolInput,

    /// Result of the tool call (PostToolUse only)
    #[serde(default)]
    pub tool_response: Option<ToolResponse>,

    /// Working directory of the session
    #[serde(default)]
    pub cwd: Option<String>,
}

/// Shell tool parameters; other tools' inputs collapse to an empty command
#[derive(Debug, Clone, Default)]
pub struct ToolInput {
    pub command: String,
}

impl<'de> Deserialize<'de> for ToolInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Deserialize as raw JSON value first
        let value = serde_json::Value::deserialize(deserializer)?;

        let Some(obj) = value.as_object() else {
            return Ok(ToolInput::default());
        };

        Ok(ToolInput {
            command: obj
                .get("command")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Result of a finished tool call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub exit_code: Option<serde_json::Value>,

    #[serde(default)]
    pub content: Option<serde_json::Value>,
}

impl ToolResponse {
    /// Exit code as reported, or `"unknown"`
    pub fn exit_code(&self) -> serde_json::Value {
        match &self.exit_code {
            Some(serde_json::Value::Null) | None => serde_json::Value::from("unknown"),
            Some(code) => code.clone(),
        }
    }

    /// Whether the user let the command run.
    ///
    /// The host does not pass its approval decision through, so non-empty
    /// output stands in for it. A command that was approved but printed
    /// nothing is recorded as denied.
    pub fn user_approved(&self) -> bool {
        match &self.content {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

impl HookInput {
    /// Parse input from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether this call goes through the shell tool
    pub fn is_shell(&self) -> bool {
        self.tool_name == SHELL_TOOL
    }

    /// The candidate shell command
    pub fn command(&self) -> &str {
        &self.tool_input.command
    }

    /// Session working directory, falling back to the process's own
    pub fn working_dir(&self) -> String {
        match &self.cwd {
            Some(cwd) => cwd.clone(),
            None => env::current_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| ".".to_string()),
        }
    }
}
