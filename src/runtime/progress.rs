use std::sync::Arc;

use crate::{
    common::Queue,
    events::ProgressUpdate,
    runtime::{NodeId, RunId},
    utils,
};

/// Step counter a node works through while executing.
///
/// Every update emits a [`ProgressUpdate`] onto the channel's progress queue.
/// Updates are lossy on purpose: when the host lags behind, newer updates
/// supersede dropped ones at the next emit.
pub struct ProgressBar {
    rid: RunId,
    nid: NodeId,
    total: u32,
    value: u32,
    queue: Arc<Queue<ProgressUpdate>>,
}

impl ProgressBar {
    pub(crate) fn new(
        rid: RunId,
        nid: NodeId,
        total: u32,
        queue: Arc<Queue<ProgressUpdate>>,
    ) -> Self {
        Self {
            rid,
            nid,
            total,
            value: 0,
            queue,
        }
    }

    /// Advance by `n` steps, clamped at `total`.
    pub fn update(
        &mut self,
        n: u32,
    ) {
        self.update_absolute(self.value.saturating_add(n));
    }

    /// Set the completed step count, clamped at `total`.
    pub fn update_absolute(
        &mut self,
        value: u32,
    ) {
        self.value = value.min(self.total);
        self.emit();
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    fn emit(&self) {
        let update = ProgressUpdate {
            rid: self.rid.clone(),
            nid: self.nid.clone(),
            value: self.value,
            total: self.total,
            timestamp: utils::time::time_millis(),
        };
        let _ = self.queue.try_send(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_bar(total: u32) -> (ProgressBar, Arc<Queue<ProgressUpdate>>) {
        let queue = Queue::new(64);
        let bar = ProgressBar::new("run1".to_string(), "node1".to_string(), total, queue.clone());
        (bar, queue)
    }

    #[test]
    fn test_update_increments_and_emits() {
        let (mut bar, queue) = create_test_bar(3);

        bar.update(1);
        bar.update(2);

        let first = queue.try_next().unwrap();
        assert_eq!(first.value, 1);
        assert_eq!(first.total, 3);

        let second = queue.try_next().unwrap();
        assert_eq!(second.value, 3);
    }

    #[test]
    fn test_update_clamps_at_total() {
        let (mut bar, queue) = create_test_bar(2);

        bar.update_absolute(9);

        assert_eq!(bar.value(), 2);
        assert_eq!(queue.try_next().unwrap().value, 2);
    }

    #[test]
    fn test_zero_update_still_emits() {
        let (mut bar, queue) = create_test_bar(3);

        bar.update(0);

        let update = queue.try_next().unwrap();
        assert_eq!(update.value, 0);
        assert_eq!(update.nid, "node1");
    }
}
