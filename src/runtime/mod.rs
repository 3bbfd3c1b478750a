pub(crate) mod channel;
mod context;
mod invoke;
mod progress;
pub(crate) mod template;

pub use channel::{Channel, ChannelEvent, ChannelOptions};
pub use context::Context;
pub use invoke::invoke;
pub use progress::ProgressBar;

/// Id of one graph invocation.
pub type RunId = String;

/// Id of a node within the graph.
pub type NodeId = String;
