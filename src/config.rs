//! Configuration loading for infra-guardrails
//!
//! Supports TOML configuration with embedded defaults. Process environment
//! is captured once into [`Environment`] and passed around explicitly.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::rules::Tool;

/// Environment variable holding the project root
pub const PROJECT_DIR_VAR: &str = "CLAUDE_PROJECT_DIR";

/// Environment variable set to "true" inside the standardized dev container
pub const CONTAINER_VAR: &str = "DEVCONTAINER";

/// Alias names must be plain command names
static ALIAS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.+-]+$").expect("alias pattern is valid"));

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable audit logging
    pub audit_log: bool,

    /// Audit directory, relative to the project directory unless absolute
    pub audit_dir: String,

    /// Append the dev-container advisory to approval prompts
    pub container_notice: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            audit_log: true,
            audit_dir: ".claude/audit".to_string(),
            container_notice: true,
        }
    }
}

/// Per-tool configuration section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ToolConfig {
    /// Extra invocation names (wrapper scripts on PATH)
    pub aliases: Vec<String>,

    /// Date-suffixed audit files; `None` keeps the tool's default
    pub rotate_daily: Option<bool>,
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub terraform: ToolConfig,
    pub helm: ToolConfig,
}

impl Config {
    /// Load configuration from the standard locations or use defaults
    pub fn load(environment: &Environment) -> Self {
        let config_paths = [
            // Project-specific config
            Some(environment.project_dir.join(".claude/infra-guardrails.toml")),
            // User-specific config
            dirs::home_dir().map(|p| p.join(".claude/infra-guardrails/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Return defaults
        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config.sanitized())
    }

    /// Drop aliases that are not plain command names
    pub fn sanitized(mut self) -> Self {
        for (name, section) in [("terraform", &mut self.terraform), ("helm", &mut self.helm)] {
            section.aliases.retain(|alias| {
                let valid = ALIAS_PATTERN.is_match(alias);
                if !valid {
                    eprintln!("Warning: Ignoring invalid {} alias {:?}", name, alias);
                }
                valid
            });
        }
        self
    }

    /// Section for one tool
    pub fn tool(&self, tool: Tool) -> &ToolConfig {
        match tool {
            Tool::Terraform => &self.terraform,
            Tool::Helm => &self.helm,
        }
    }

    /// Whether a tool's audit file is date-suffixed
    pub fn rotate_daily(&self, tool: Tool) -> bool {
        self.tool(tool)
            .rotate_daily
            .unwrap_or(tool.profile().rotate_daily)
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get the audit directory, resolved against the project directory
    pub fn audit_dir(&self, environment: &Environment) -> Option<PathBuf> {
        if !self.general.audit_log {
            return None;
        }
        let dir = Self::expand_path(&self.general.audit_dir);
        if dir.is_absolute() {
            Some(dir)
        } else {
            Some(environment.project_dir.join(dir))
        }
    }
}

/// Process environment the hooks depend on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Project root (`CLAUDE_PROJECT_DIR`, default ".")
    pub project_dir: PathBuf,

    /// Running inside the standardized dev container
    pub in_container: bool,
}

impl Environment {
    /// Read from the process environment
    pub fn from_env() -> Self {
        Self {
            project_dir: env::var_os(PROJECT_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            in_container: env::var(CONTAINER_VAR).map(|v| v == "true").unwrap_or(false),
        }
    }

    /// Fixed environment, for tests and embedding
    pub fn new(project_dir: impl Into<PathBuf>, in_container: bool) -> Self {
        Self {
            project_dir: project_dir.into(),
            in_container,
        }
    }
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
audit_log = true
audit_dir = ".claude/audit"
container_notice = true

[terraform]
# Wrapper scripts on PATH that run terraform, e.g. ["tfm", "tfwrapper"]
aliases = []
rotate_daily = false

[helm]
aliases = []
rotate_daily = true
"#;
