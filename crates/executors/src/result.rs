use std::{process::ExitStatus, time::Duration};

use serde::{Deserialize, Serialize};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    /// Non-zero exit. `exit_code` is `None` when a signal ended the process.
    Failed {
        exit_code: Option<i32>,
    },
    TimedOut {
        after_ms: u64,
    },
    Cancelled,
    SpawnFailed,
}

/// The text shown to the user plus how the run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub output: String,
    pub outcome: Outcome,
}

impl ExecutionResult {
    /// Exit 0 selects stdout, anything else selects stderr. The other stream
    /// is discarded.
    pub fn from_exit(status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> Self {
        if status.success() {
            Self {
                output: decode_trimmed(stdout),
                outcome: Outcome::Succeeded,
            }
        } else {
            Self {
                output: decode_trimmed(stderr),
                outcome: Outcome::Failed {
                    exit_code: status.code(),
                },
            }
        }
    }

    pub fn timed_out(after: Duration, stderr: &[u8]) -> Self {
        let output = non_empty_or(stderr, || {
            format!("command timed out after {}s", after.as_secs_f64())
        });
        Self {
            output,
            outcome: Outcome::TimedOut {
                after_ms: after.as_millis() as u64,
            },
        }
    }

    pub fn cancelled(stderr: &[u8]) -> Self {
        Self {
            output: non_empty_or(stderr, || "command cancelled".to_string()),
            outcome: Outcome::Cancelled,
        }
    }

    pub fn spawn_failed(program: &str, error: &std::io::Error) -> Self {
        Self {
            output: format!("failed to start `{program}`: {error}"),
            outcome: Outcome::SpawnFailed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Succeeded)
    }
}

fn decode_trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

fn non_empty_or(bytes: &[u8], fallback: impl FnOnce() -> String) -> String {
    let text = decode_trimmed(bytes);
    if text.is_empty() { fallback() } else { text }
}
