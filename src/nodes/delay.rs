use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    common::Vars,
    config::DEFAULT_DELAY_TICK,
    nodes::{Node, NodeOutput, NodeType},
    runtime::{Context, NodeId},
};

/// Delay node.
///
/// Pauses the graph for a configured duration, reporting progress in fixed
/// tick increments, then passes its inputs through unchanged.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DelayNode {
    // duration in milliseconds
    #[serde(default = "default_duration")]
    duration: u64,
    // progress tick in milliseconds
    #[serde(default)]
    tick: Option<u64>,
}

fn default_duration() -> u64 {
    1000
}

#[async_trait]
#[typetag::serde]
impl Node for DelayNode {
    fn create(params: serde_json::Value) -> Result<Self> {
        jsonschema::validate(&Self::schema(), &params)?;
        let node = serde_json::from_value::<Self>(params)?;
        Ok(node)
    }

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "duration": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": 3600000,
                    "default": 1000,
                    "description": "How long to pause, in milliseconds"
                },
                "tick": {
                    "type": ["integer", "null"],
                    "minimum": 10,
                    "maximum": 60000,
                    "description": "Progress update increment in milliseconds"
                }
            }
        })
    }

    fn node_type(&self) -> NodeType {
        NodeType::Delay
    }

    async fn run(
        &self,
        ctx: Arc<Context>,
        nid: NodeId,
        inputs: Vars,
    ) -> Result<NodeOutput> {
        // schema enforces tick >= 10; the floor covers paths that skip create()
        let tick = self.tick.unwrap_or(DEFAULT_DELAY_TICK).max(1);

        let full_ticks = self.duration / tick;
        let remainder = self.duration % tick;
        let total = full_ticks + u64::from(remainder > 0);

        let mut pbar = ctx.progress(nid, total.max(1) as u32);

        if self.duration == 0 {
            pbar.update_absolute(1);
            return Ok(NodeOutput::succeeded("Done", "delayed 0 ms", inputs));
        }

        for _ in 0..full_ticks {
            tokio::time::sleep(std::time::Duration::from_millis(tick)).await;
            pbar.update(1);
        }
        if remainder > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(remainder)).await;
            pbar.update(1);
        }

        Ok(NodeOutput::succeeded("Done", format!("delayed {} ms", self.duration), inputs))
    }
}
