use std::{collections::HashMap, sync::Arc};

use serde_json::Value;

use crate::{
    Config, HookflowError, Result,
    nodes::{DelayNode, Node, TriggerNode, WebhookNode},
};

type NodeFactory = Arc<dyn Fn(Value) -> Result<Box<dyn Node>> + Send + Sync>;

struct NodeEntry {
    display_name: String,
    schema: Value,
    factory: NodeFactory,
}

/// Registry of node types the host can instantiate.
///
/// Each entry maps a node type string to the display name shown in the host
/// GUI, the params schema its widgets are rendered from, and a factory that
/// builds the node from a params object.
pub struct NodeRegistry {
    entries: HashMap<String, NodeEntry>,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        NodeRegistry {
            entries: HashMap::new(),
        }
    }

    /// Registry with the built-in nodes, wired to the given config defaults.
    pub fn with_defaults(config: Config) -> Self {
        let mut registry = Self::new();

        let user_agent = config.http.user_agent;
        registry.register("webhook", "Webhook Notification", WebhookNode::schema(), move |params| {
            let params = merge_default(params, "user_agent", Value::String(user_agent.clone()));
            Ok(Box::new(WebhookNode::create(params)?))
        });

        let tick = config.delay.tick;
        registry.register("delay", "Delay", DelayNode::schema(), move |params| {
            let params = merge_default(params, "tick", Value::from(tick));
            Ok(Box::new(DelayNode::create(params)?))
        });

        registry.register("trigger", "Trigger Gate", TriggerNode::schema(), |params| Ok(Box::new(TriggerNode::create(params)?)));

        registry
    }

    /// Register a node type.
    pub fn register(
        &mut self,
        node_type: &str,
        display_name: &str,
        schema: Value,
        factory: impl Fn(Value) -> Result<Box<dyn Node>> + Send + Sync + 'static,
    ) {
        self.entries.insert(
            node_type.to_string(),
            NodeEntry {
                display_name: display_name.to_string(),
                schema,
                factory: Arc::new(factory),
            },
        );
    }

    /// Create a node of `node_type` from `params`.
    pub fn create(
        &self,
        node_type: &str,
        params: Value,
    ) -> Result<Box<dyn Node>> {
        let entry = self.entries.get(node_type).ok_or_else(|| HookflowError::Node(format!("unknown node type '{}'", node_type)))?;
        (entry.factory)(params)
    }

    /// The params schema of `node_type`.
    pub fn schema(
        &self,
        node_type: &str,
    ) -> Result<&Value> {
        self.entries.get(node_type).map(|entry| &entry.schema).ok_or_else(|| HookflowError::Node(format!("unknown node type '{}'", node_type)))
    }

    /// The GUI display name of `node_type`.
    pub fn display_name(
        &self,
        node_type: &str,
    ) -> Option<&str> {
        self.entries.get(node_type).map(|entry| entry.display_name.as_str())
    }

    /// All registered node type strings.
    pub fn registered_types(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// The node type to display name mapping the host GUI lists.
    pub fn display_names(&self) -> Vec<(String, String)> {
        self.entries.iter().map(|(node_type, entry)| (node_type.clone(), entry.display_name.clone())).collect()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::with_defaults(Config::default())
    }
}

/// Fill in a params key from config when the host left it unset.
fn merge_default(
    mut params: Value,
    key: &str,
    value: Value,
) -> Value {
    if let Value::Object(map) = &mut params {
        map.entry(key).or_insert(value);
    }
    params
}
