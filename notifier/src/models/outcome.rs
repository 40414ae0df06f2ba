//! Notification outcome and the result report printed by the CLI

use colored::Colorize;
use serde::Serialize;

/// Prefix for every failure reported to the operator
pub const FAILURE_PREFIX: &str = "unable to send deployment event to Dynatrace";

/// Result of one notification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The tenant accepted the event (HTTP 200 or 201), or a dry run
    Success,

    /// Transport failure or rejection, carrying the underlying message verbatim
    Failure { message: String },
}

impl NotificationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, NotificationOutcome::Success)
    }
}

/// Process exit codes
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

/// Structured result of an invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleResult {
    pub changed: bool,

    pub failed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,

    #[serde(skip)]
    exit_code: i32,
}

impl ModuleResult {
    pub fn changed(dry_run: bool) -> Self {
        Self {
            changed: true,
            failed: false,
            msg: None,
            dry_run,
            exit_code: exit_code::SUCCESS,
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            changed: false,
            failed: true,
            msg: Some(format!("{}: {}", FAILURE_PREFIX, message)),
            dry_run: false,
            exit_code: exit_code::FAILURE,
        }
    }

    pub fn config_error(message: &str) -> Self {
        Self {
            changed: false,
            failed: true,
            msg: Some(message.to_string()),
            dry_run: false,
            exit_code: exit_code::CONFIG_ERROR,
        }
    }

    pub fn from_outcome(outcome: &NotificationOutcome, dry_run: bool) -> Self {
        match outcome {
            NotificationOutcome::Success => Self::changed(dry_run),
            NotificationOutcome::Failure { message } => Self::failed(message),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn is_config_error(&self) -> bool {
        self.exit_code == exit_code::CONFIG_ERROR
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// One line, colored the way an automation run log reads
    pub fn to_text(&self) -> String {
        match (&self.msg, self.failed, self.dry_run) {
            (Some(msg), true, _) => format!("{} {}", "failed:".red().bold(), msg.red()),
            (_, _, true) => format!("{} deployment event (dry run)", "changed:".yellow()),
            _ => format!("{} deployment event sent", "changed:".yellow()),
        }
    }
}
