use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("execution {0} is already running")]
    AlreadyRunning(Uuid),
    #[error("execution {0} not found")]
    NotFound(Uuid),
}

#[derive(Debug, Clone, Serialize)]
pub struct RunningExecution {
    pub id: Uuid,
    pub command: String,
    pub started_at: DateTime<Utc>,
}

struct TrackedExecution {
    info: RunningExecution,
    cancel: CancellationToken,
}

/// Commands that are currently running, keyed by execution id.
#[derive(Clone, Default)]
pub struct ExecutionTracker {
    running: Arc<DashMap<Uuid, TrackedExecution>>,
}

/// Keeps an execution registered until it is dropped.
pub struct ExecutionGuard {
    id: Uuid,
    cancel: CancellationToken,
    running: Arc<DashMap<Uuid, TrackedExecution>>,
}

impl ExecutionGuard {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for ExecutionGuard {
    fn drop(&mut self) {
        self.running.remove(&self.id);
    }
}

impl ExecutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: Uuid, command: String) -> Result<ExecutionGuard, TrackerError> {
        let cancel = CancellationToken::new();
        match self.running.entry(id) {
            Entry::Occupied(_) => return Err(TrackerError::AlreadyRunning(id)),
            Entry::Vacant(slot) => {
                slot.insert(TrackedExecution {
                    info: RunningExecution {
                        id,
                        command,
                        started_at: Utc::now(),
                    },
                    cancel: cancel.clone(),
                });
            }
        }
        Ok(ExecutionGuard {
            id,
            cancel,
            running: self.running.clone(),
        })
    }

    /// Running executions, oldest first.
    pub fn list(&self) -> Vec<RunningExecution> {
        let mut running: Vec<_> = self
            .running
            .iter()
            .map(|entry| entry.value().info.clone())
            .collect();
        running.sort_by_key(|execution| execution.started_at);
        running
    }

    pub fn cancel(&self, id: Uuid) -> Result<(), TrackerError> {
        let tracked = self.running.get(&id).ok_or(TrackerError::NotFound(id))?;
        tracing::info!(%id, command = %tracked.info.command, "cancelling execution");
        tracked.cancel.cancel();
        Ok(())
    }

    pub fn is_running(&self, id: Uuid) -> bool {
        self.running.contains_key(&id)
    }
}
