use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    Result,
    common::Vars,
    nodes::{Node, NodeOutput, NodeType},
    runtime::{Context, NodeId},
};

/// Trigger gate node.
///
/// Passes its inputs through when the upstream `trigger` boolean is true and
/// skips otherwise, so downstream nodes only fire on an armed branch. An
/// unwired trigger counts as armed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TriggerNode;

#[async_trait]
#[typetag::serde]
impl Node for TriggerNode {
    fn create(_: serde_json::Value) -> Result<Self> {
        Ok(TriggerNode)
    }

    fn schema() -> serde_json::Value {
        json!({})
    }

    fn node_type(&self) -> NodeType {
        NodeType::Trigger
    }

    async fn run(
        &self,
        _: Arc<Context>,
        _: NodeId,
        inputs: Vars,
    ) -> Result<NodeOutput> {
        let trigger = inputs.get::<bool>("trigger").unwrap_or(true);

        if trigger {
            Ok(NodeOutput::succeeded("Triggered", "trigger passed through", inputs))
        } else {
            Ok(NodeOutput::skipped("trigger is false"))
        }
    }
}
