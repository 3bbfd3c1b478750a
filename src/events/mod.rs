//! Event types emitted during node execution.
//!
//! Nodes report progress updates and log lines to the host through the
//! channel; both are plain data carrying the run and node ids they belong to.

use serde::{Deserialize, Serialize};

use crate::runtime::{NodeId, RunId};

/// Generic event wrapper.
#[derive(Debug, Clone)]
pub struct Event<T> {
    inner: T,
}

/// Log entry emitted during node execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    /// Run ID that generated this log.
    pub rid: RunId,
    /// Node ID that generated this log.
    pub nid: NodeId,
    /// Log message content.
    pub content: String,
    /// Timestamp in milliseconds of the log entry.
    pub timestamp: i64,
}

/// Progress update emitted while a node works through its steps.
///
/// The host GUI consumes these to animate its per-node progress bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Run ID the update belongs to.
    pub rid: RunId,
    /// Node ID the update belongs to.
    pub nid: NodeId,
    /// Completed steps, `0..=total`.
    pub value: u32,
    /// Total number of steps.
    pub total: u32,
    /// Timestamp in milliseconds of the update.
    pub timestamp: i64,
}

impl<T> std::ops::Deref for Event<T>
where
    T: std::fmt::Debug + Clone,
{
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> Event<T>
where
    T: std::fmt::Debug + Clone,
{
    pub fn new(inner: &T) -> Self {
        Self {
            inner: inner.clone(),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}
