pub mod delay;
pub mod registry;
pub mod trigger;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    common::Vars,
    runtime::{Context, NodeId},
};

pub use delay::DelayNode;
pub use registry::NodeRegistry;
pub use trigger::TriggerNode;
pub use webhook::WebhookNode;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeType {
    #[default]
    None,
    Webhook,
    Delay,
    Trigger,
}

/// Outcome of one node invocation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeStatus {
    Succeeded,
    Skipped,
    Failed,
}

#[async_trait]
#[typetag::serde(tag = "type")]
pub trait Node: Send + Sync {
    /// Creates a new instance of the node from the given params.
    ///
    /// # Arguments
    ///
    /// * `params` - The [`serde_json::Value`] containing the params for the node,
    ///   validated against [`Node::schema`].
    ///
    /// # Returns
    ///
    /// Returns a [`Result`] containing the created node instance.
    fn create(params: serde_json::Value) -> Result<Self>
    where
        Self: Sized;

    /// Returns the params schema of the node.
    ///
    /// The host GUI renders its widgets (labels, defaults, numeric ranges)
    /// from this schema.
    ///
    /// # Returns
    ///
    /// Returns a [`serde_json::Value`] representing the schema of the node.
    fn schema() -> serde_json::Value
    where
        Self: Sized;

    /// Returns the type of the node.
    /// # Returns
    ///
    /// Returns the [`NodeType`] of the node.
    fn node_type(&self) -> NodeType;

    /// Executes the node once with the given context and upstream inputs.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The [`Context`] of the graph invocation.
    /// * `nid` - The id of the node.
    /// * `inputs` - Upstream values wired into the node.
    ///
    /// # Returns
    ///
    /// Returns a [`Result<NodeOutput>`] representing the outcome of the node.
    /// Expected failures (malformed user JSON, an endpoint rejecting the
    /// request) come back as a failed [`NodeOutput`], not as `Err`.
    async fn run(
        &self,
        ctx: Arc<Context>,
        nid: NodeId,
        inputs: Vars,
    ) -> Result<NodeOutput>;
}

/// Output returned by a node's run method.
///
/// `summary` and `response` are the two strings the host UI displays for the
/// node; `outputs` carries the pass-through values downstream nodes receive.
#[derive(Debug, Clone)]
pub struct NodeOutput {
    /// node execution status
    pub status: NodeStatus,
    /// short status line, e.g. "Success (200)"
    pub summary: String,
    /// response detail, e.g. the endpoint's body or an error reason
    pub response: String,
    /// pass-through outputs
    pub outputs: Vars,
}

impl NodeOutput {
    /// Create a successful node output
    pub fn succeeded(
        summary: impl Into<String>,
        response: impl Into<String>,
        outputs: Vars,
    ) -> Self {
        Self {
            status: NodeStatus::Succeeded,
            summary: summary.into(),
            response: response.into(),
            outputs,
        }
    }

    /// Create a skipped node output
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: NodeStatus::Skipped,
            summary: "Skipped".to_string(),
            response: reason.into(),
            outputs: Vars::new(),
        }
    }

    /// Create a failed node output
    pub fn failed(
        summary: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            status: NodeStatus::Failed,
            summary: summary.into(),
            response: response.into(),
            outputs: Vars::new(),
        }
    }
}
