use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::{
    Result,
    common::Vars,
    nodes::{NodeOutput, NodeRegistry},
    runtime::{Context, NodeId},
};

/// Run a registered node once.
///
/// Creates the node from `params` via the registry, executes it with the
/// upstream `inputs`, records its pass-through outputs under `nid` so later
/// nodes can reference them, and emits the status/response pair as a log line.
pub async fn invoke(
    registry: &NodeRegistry,
    ctx: Arc<Context>,
    nid: NodeId,
    node_type: &str,
    params: Value,
    inputs: Vars,
) -> Result<NodeOutput> {
    let node = registry.create(node_type, params)?;

    debug!(nid = %nid, node_type, "running node");
    let output = node.run(ctx.clone(), nid.clone(), inputs).await?;

    ctx.add_output(nid.clone(), output.outputs.clone());
    ctx.emit_log(nid, format!("{}: {}", output.summary, output.response));

    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use serde_json::json;

    use super::*;
    use crate::{Config, nodes::NodeStatus, runtime::Channel};

    fn create_test_context() -> Arc<Context> {
        static RUNTIME: OnceLock<Arc<tokio::runtime::Runtime>> = OnceLock::new();
        let runtime = RUNTIME.get_or_init(|| Arc::new(tokio::runtime::Runtime::new().unwrap())).clone();
        let channel = Arc::new(Channel::new(runtime));
        Arc::new(Context::new("test-rid".to_string(), channel))
    }

    #[tokio::test]
    async fn test_invoke_records_outputs() {
        let registry = NodeRegistry::with_defaults(Config::default());
        let ctx = create_test_context();

        let mut inputs = Vars::new();
        inputs.set("value", "frame-1");

        let output = invoke(&registry, ctx.clone(), "gate1".to_string(), "trigger", json!({}), inputs).await.unwrap();

        assert_eq!(output.status, NodeStatus::Succeeded);
        let recorded = ctx.outputs().get(&"gate1".to_string()).unwrap();
        assert_eq!(recorded.get::<String>("value"), Some("frame-1".to_string()));
    }

    #[tokio::test]
    async fn test_invoke_emits_status_log() {
        let registry = NodeRegistry::with_defaults(Config::default());
        let ctx = create_test_context();
        let mut log_queue = ctx.channel().log_queue().subscribe();

        invoke(&registry, ctx.clone(), "gate1".to_string(), "trigger", json!({}), Vars::new()).await.unwrap();

        let log = log_queue.recv().await.unwrap();
        assert_eq!(log.nid, "gate1");
        assert!(log.content.starts_with("Triggered"));
    }

    #[tokio::test]
    async fn test_invoke_unknown_node_type() {
        let registry = NodeRegistry::with_defaults(Config::default());
        let ctx = create_test_context();

        let result = invoke(&registry, ctx, "x".to_string(), "nonexistent", json!({}), Vars::new()).await;
        assert!(result.is_err());
    }
}
