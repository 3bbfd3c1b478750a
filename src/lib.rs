//! # Hookflow
//!
//! Hookflow is a set of stateless plugin nodes for node-graph image pipelines:
//! a webhook notification node, a delay node, and a trigger gate. It is designed
//! to be embedded in a workflow host; the host owns the graph, the scheduling,
//! and the GUI, and plugs into the node/registry/context seams exposed here.
//!
//! ## Core Features
//!
//! - **Schema-Described Nodes**: every node publishes a JSON Schema the host GUI
//!   renders widgets from, and params are validated against it on creation
//! - **Webhook Delivery**: a single outbound HTTP POST per invocation, with
//!   multipart-vs-JSON payload branching and tensor-to-PNG conversion
//! - **Progress And Logs**: nodes report progress updates and log lines to the
//!   host through a channel seam
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hookflow::{Config, Context, NodeRegistry, Vars, invoke};
//!
//! let registry = NodeRegistry::with_defaults(Config::default());
//! let ctx = Arc::new(Context::new(hookflow::utils::longid(), channel));
//!
//! let params = serde_json::json!({"webhook_url": "https://example.com/hook"});
//! let output = invoke(&registry, ctx, "hook1".to_string(), "webhook", params, Vars::new()).await?;
//! println!("{}: {}", output.summary, output.response);
//! ```

mod common;
mod config;
mod error;
mod events;
mod nodes;
mod runtime;
mod tensor;
pub mod utils;
mod webhook;

pub use common::{MemCache, Queue, Vars};
pub use config::{Config, DelayConfig, HttpConfig};
pub use error::HookflowError;
pub use events::{Event, Log, ProgressUpdate};
pub use nodes::{DelayNode, Node, NodeOutput, NodeRegistry, NodeStatus, NodeType, TriggerNode, WebhookNode};
pub use runtime::{Channel, ChannelEvent, ChannelOptions, Context, NodeId, ProgressBar, RunId, invoke};
pub use tensor::ImageTensor;
pub use webhook::{DeliveryReport, WebhookRequest, WebhookSender};

/// Result type alias for Hookflow operations.
pub type Result<T> = std::result::Result<T, HookflowError>;

/// Thread-safe shared lock wrapper using Arc<RwLock<T>>.
pub(crate) type ShareLock<T> = std::sync::Arc<std::sync::RwLock<T>>;
