//! JSONL audit logging for infra-guardrails
//!
//! Records every governed command to a per-tool JSONL file: once when the
//! validator classifies it and once when the logger sees the result. The two
//! records share no identifier; they line up by command text and time.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Decision label stored in the audit file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditDecision {
    Blocked,
    PendingApproval,
    PendingApprovalSuspicious,
    CompletedSuccess,
    CompletedFailure,
    DeniedByUser,
}

/// Pre-execution record written by the validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionEntry {
    pub timestamp: DateTime<Local>,
    pub command: String,
    pub decision: AuditDecision,
    pub working_dir: String,
    pub reason: String,
}

/// Post-execution record written by the logger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub timestamp: DateTime<Local>,
    pub command: String,
    pub decision: AuditDecision,
    pub working_dir: String,

    /// Whatever the host reported; `"unknown"` when absent
    pub exit_code: serde_json::Value,
    pub success: bool,
    pub user_approved: bool,
}

/// One line of the audit file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuditEntry {
    Completion(CompletionEntry),
    Decision(DecisionEntry),
}

impl AuditEntry {
    /// Create a pre-execution entry stamped now
    pub fn decision(
        command: &str,
        decision: AuditDecision,
        working_dir: &str,
        reason: impl Into<String>,
    ) -> Self {
        AuditEntry::Decision(DecisionEntry {
            timestamp: Local::now(),
            command: command.to_string(),
            decision,
            working_dir: working_dir.to_string(),
            reason: reason.into(),
        })
    }

    /// Create a post-execution entry stamped now
    pub fn completion(
        command: &str,
        working_dir: &str,
        exit_code: serde_json::Value,
        success: bool,
        user_approved: bool,
    ) -> Self {
        AuditEntry::Completion(CompletionEntry {
            timestamp: Local::now(),
            command: command.to_string(),
            decision: completion_status(success, user_approved),
            working_dir: working_dir.to_string(),
            exit_code,
            success,
            user_approved,
        })
    }

    pub fn command(&self) -> &str {
        match self {
            AuditEntry::Completion(e) => &e.command,
            AuditEntry::Decision(e) => &e.command,
        }
    }

    pub fn audit_decision(&self) -> AuditDecision {
        match self {
            AuditEntry::Completion(e) => e.decision,
            AuditEntry::Decision(e) => e.decision,
        }
    }

    pub fn working_dir(&self) -> &str {
        match self {
            AuditEntry::Completion(e) => &e.working_dir,
            AuditEntry::Decision(e) => &e.working_dir,
        }
    }

    /// Parse one line of an audit file
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Label for a finished command
pub fn completion_status(success: bool, user_approved: bool) -> AuditDecision {
    if !user_approved {
        AuditDecision::DeniedByUser
    } else if success {
        AuditDecision::CompletedSuccess
    } else {
        AuditDecision::CompletedFailure
    }
}

/// File name for a tool's audit log, dated when rotating daily
pub fn log_file_name(tool_id: &str, rotate_daily: bool, today: NaiveDate) -> String {
    if rotate_daily {
        format!("{}-{}.log", tool_id, today.format("%Y-%m-%d"))
    } else {
        format!("{}.log", tool_id)
    }
}

/// Append-only audit log
///
/// The file is opened per record in append mode and each record goes out in
/// a single write, so hooks running in parallel interleave whole lines.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    path: Option<PathBuf>,
}

impl AuditLog {
    /// Create a new audit log writing to `path`; `None` disables it
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }

    /// Audit log for one tool inside `dir`
    pub fn for_tool(dir: &Path, tool_id: &str, rotate_daily: bool) -> Self {
        let name = log_file_name(tool_id, rotate_daily, Local::now().date_naive());
        Self {
            path: Some(dir.join(name)),
        }
    }

    /// A log that drops every record
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Append one entry, creating the directory on first use
    pub fn append(&mut self, entry: &AuditEntry) -> Result<(), std::io::Error> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())?;
        file.flush()
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Target file, if enabled
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
