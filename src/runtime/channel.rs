use std::sync::{Arc, RwLock};

use futures::future::BoxFuture;
use tokio::runtime::Runtime;

use crate::{
    ShareLock,
    common::{BroadcastQueue, Queue, Shutdown},
    events::{Event, Log, ProgressUpdate},
};

macro_rules! dispatch_event {
    ($handles:expr, $(&$item:ident), +) => {
        let handlers = $handles.read().unwrap();
        for handle in handlers.iter() {
            (handle)($(&$item),+);
        }
    };
}

macro_rules! dispatch_event_async {
    ($handles:expr, $(&$item:ident), +) => {
        let handles = $handles.clone();

        tokio::spawn(async move {
            let handlers = handles.read().unwrap().clone();
            for handle in handlers.iter() {
                (handle)($(&$item),+).await;
            }
        });
    };
}

const PROGRESS_QUEUE_SIZE: usize = 2048;
const LOG_QUEUE_SIZE: usize = 4096;

pub type NodeLogHandle = Arc<dyn Fn(&Event<Log>) + Send + Sync>;
pub type NodeLogHandleAsync = Arc<dyn Fn(&Event<Log>) -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ChannelOptions {
    /// use the glob pattern to match the run id
    /// eg. run1*
    pub rid: String,

    /// use the glob pattern to match the node id
    /// eg. nid1*
    pub nid: String,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            rid: "*".to_string(),
            nid: "*".to_string(),
        }
    }
}

impl ChannelOptions {
    pub fn new(
        rid: String,
        nid: String,
    ) -> Self {
        Self {
            rid,
            nid,
        }
    }

    pub fn with_rid(rid: String) -> Self {
        Self {
            rid,
            nid: "*".to_string(),
        }
    }

    pub fn with_nid(nid: String) -> Self {
        Self {
            rid: "*".to_string(),
            nid,
        }
    }
}

/// Host communication seam.
///
/// Progress updates go onto a bounded queue the host GUI drains; log lines
/// are broadcast to every registered handler.
#[derive(Clone)]
pub struct Channel {
    progress_queue: Arc<Queue<ProgressUpdate>>,
    log_queue: Arc<BroadcastQueue<Event<Log>>>,

    logs: ShareLock<Vec<NodeLogHandle>>,
    logs_async: ShareLock<Vec<NodeLogHandleAsync>>,

    runtime: Arc<Runtime>,
    shutdown: Shutdown,
}

impl Channel {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self {
            progress_queue: Queue::new(PROGRESS_QUEUE_SIZE),
            log_queue: BroadcastQueue::new(LOG_QUEUE_SIZE),
            logs: Arc::new(RwLock::new(Vec::new())),
            logs_async: Arc::new(RwLock::new(Vec::new())),
            runtime,
            shutdown: Shutdown::new(),
        }
    }

    /// The progress queue the host GUI drains.
    pub fn progress(&self) -> Arc<Queue<ProgressUpdate>> {
        self.progress_queue.clone()
    }

    pub(crate) fn log_queue(&self) -> Arc<BroadcastQueue<Event<Log>>> {
        self.log_queue.clone()
    }

    /// Start dispatching log events to registered handlers.
    pub fn listen(&self) {
        let mut log_queue = self.log_queue.subscribe();
        let logs = self.logs.clone();
        let logs_async = self.logs_async.clone();

        let shutdown = self.shutdown.clone();
        self.runtime.spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.wait() => break,
                    Ok(log) = log_queue.recv() => {
                        let l = log.clone();
                        dispatch_event!(logs, &l);
                        dispatch_event_async!(logs_async, &log);
                    }
                }
            }
        });
    }

    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }
}

/// Filtered view over a channel's log stream.
#[derive(Clone)]
pub struct ChannelEvent {
    channel: Arc<Channel>,

    glob: (globset::GlobMatcher, globset::GlobMatcher),
}

impl ChannelEvent {
    pub fn channel(
        channel: Arc<Channel>,
        options: ChannelOptions,
    ) -> Self {
        Self {
            channel,
            glob: (
                globset::Glob::new(&options.rid).unwrap().compile_matcher(),
                globset::Glob::new(&options.nid).unwrap().compile_matcher(),
            ),
        }
    }

    pub fn on_log(
        &self,
        f: impl Fn(&Event<Log>) + Send + Sync + 'static,
    ) {
        let glob = self.glob.clone();

        self.channel.logs.write().unwrap().push(Arc::new(move |e| {
            if is_match(&glob, e) {
                f(e);
            }
        }));
    }

    pub fn on_log_async<F>(
        &self,
        f: F,
    ) where
        F: Fn(&Event<Log>) -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        let glob = self.glob.clone();

        self.channel.logs_async.write().unwrap().push(Arc::new(move |e| {
            if is_match(&glob, e) {
                f(e)
            } else {
                Box::pin(async {})
            }
        }));
    }
}

fn is_match(
    glob: &(globset::GlobMatcher, globset::GlobMatcher),
    e: &Event<Log>,
) -> bool {
    let (pat_rid, pat_nid) = glob;
    pat_rid.is_match(&e.rid) && pat_nid.is_match(&e.nid)
}
