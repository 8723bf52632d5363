//! Execution record -- outcome of running the target once.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How the runner decided to handle the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchKind {
    /// Run under an interpreter chosen by extension
    Interpreter,
    /// Read only; no process is spawned
    Text,
    /// Marked executable and run directly
    Binary,
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interpreter => write!(f, "interpreter"),
            Self::Text => write!(f, "text"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// Captured output of one stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedOutput {
    /// Lossy UTF-8 rendering of what was read
    pub text: String,
    /// Set when the stream produced more than the capture cap
    pub truncated: bool,
}

/// Outcome of the single execution step.
///
/// A timeout is a normal outcome (`timed_out`), not an error. `error` is
/// only set when the step failed and was handled, e.g. the interpreter
/// could not be started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub target: PathBuf,
    pub dispatch: DispatchKind,
    /// Program actually launched (absent for text dispatch)
    pub program: Option<String>,
    pub args: Vec<String>,
    pub exit_code: Option<i32>,
    /// Terminating signal, when the child did not exit normally
    pub signal: Option<i32>,
    pub stdout: CapturedOutput,
    pub stderr: CapturedOutput,
    /// Characters read, for text dispatch only
    pub content_length: Option<usize>,
    pub elapsed_ms: u64,
    pub timed_out: bool,
    pub error: Option<String>,
}

impl ExecutionRecord {
    /// Empty record for `target`, filled in by the runner.
    pub fn new(target: PathBuf, dispatch: DispatchKind) -> Self {
        Self {
            target,
            dispatch,
            program: None,
            args: Vec::new(),
            exit_code: None,
            signal: None,
            stdout: CapturedOutput {
                text: String::new(),
                truncated: false,
            },
            stderr: CapturedOutput {
                text: String::new(),
                truncated: false,
            },
            content_length: None,
            elapsed_ms: 0,
            timed_out: false,
            error: None,
        }
    }

    /// Whether the execution step failed (timeouts do not count).
    pub const fn failed(&self) -> bool {
        self.error.is_some()
    }
}
