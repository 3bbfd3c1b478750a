use std::sync::Arc;

use crate::{
    common::{MemCache, Vars},
    events::{Event, Log},
    runtime::{Channel, NodeId, ProgressBar, RunId},
    utils,
};

/// Call-scoped state for one graph invocation.
///
/// Holds the env variables the host exposes to template resolution, the
/// outputs recorded per node, and the channel nodes report through. Nodes
/// themselves stay stateless; everything here is owned by the invocation.
#[derive(Clone)]
pub struct Context {
    rid: RunId,
    env: Arc<MemCache<String, String>>,
    outputs: Arc<MemCache<NodeId, Vars>>,
    channel: Arc<Channel>,
}

impl Context {
    pub fn new(
        rid: RunId,
        channel: Arc<Channel>,
    ) -> Self {
        Self {
            rid,
            env: Arc::new(MemCache::new(1024)),
            outputs: Arc::new(MemCache::new(1024)),
            channel,
        }
    }

    pub fn env(&self) -> Arc<MemCache<String, String>> {
        self.env.clone()
    }

    pub fn outputs(&self) -> Arc<MemCache<NodeId, Vars>> {
        self.outputs.clone()
    }

    pub fn add_output(
        &self,
        nid: NodeId,
        outputs: Vars,
    ) {
        self.outputs.set(nid, outputs);
    }

    pub fn channel(&self) -> Arc<Channel> {
        self.channel.clone()
    }

    pub fn emit_log(
        &self,
        nid: NodeId,
        content: String,
    ) {
        let log = Log {
            rid: self.rid.clone(),
            nid,
            content,
            timestamp: utils::time::time_millis(),
        };
        let _ = self.channel.log_queue().send(Event::new(&log));
    }

    /// Progress bar for `nid` with `total` steps, feeding the host GUI.
    pub fn progress(
        &self,
        nid: NodeId,
        total: u32,
    ) -> ProgressBar {
        ProgressBar::new(self.rid.clone(), nid, total, self.channel.progress())
    }

    pub fn rid(&self) -> RunId {
        self.rid.to_owned()
    }
}
