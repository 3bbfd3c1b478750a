use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::{
    HookflowError, Result,
    common::Vars,
    config::DEFAULT_USER_AGENT,
    nodes::{Node, NodeOutput, NodeType},
    runtime::{Context, NodeId, template},
    tensor::ImageTensor,
    webhook::{WebhookRequest, WebhookSender},
};

use super::models::*;

const STATUS_KEY: &str = "status";
const RESPONSE_KEY: &str = "response";

/// Webhook notification node.
///
/// Sends the upstream image and a user-supplied JSON payload to a
/// user-supplied URL in a single POST, and reports the endpoint's answer as
/// the node's status/response pair.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WebhookNode {
    webhook_url: String,
    #[serde(default = "default_json_data")]
    json_data: String,
    #[serde(default = "default_custom_headers")]
    custom_headers: String,
    // request timeout in seconds
    #[serde(default = "default_timeout")]
    timeout: u64,
    #[serde(default)]
    send_as_json: bool,
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default)]
    auth: AuthorizationConfig,
    #[serde(default)]
    user_agent: Option<String>,
}

fn default_json_data() -> String {
    "{}".to_string()
}

fn default_custom_headers() -> String {
    "{}".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_enabled() -> bool {
    true
}

impl WebhookNode {
    /// Apply authorization headers based on auth config
    fn apply_auth_headers(
        &self,
        headers: &mut HeaderMap,
    ) -> Result<()> {
        match &self.auth.auth_type {
            AuthorizationType::NoAuth => {}
            AuthorizationType::ApiKey(api_key_type) => {
                let api_key = self.auth.api_key.as_ref().ok_or_else(|| HookflowError::Node("api_key is required for api-key authorization".to_string()))?;

                // Default header name is "Authorization"
                let header_name = self.auth.header.as_deref().unwrap_or("Authorization");
                let header_key: HeaderName = header_name.parse().map_err(|err: reqwest::header::InvalidHeaderName| HookflowError::Runtime(err.to_string()))?;

                let header_value = match api_key_type {
                    ApiKeyType::Bearer => format!("Bearer {}", api_key),
                    ApiKeyType::Basic => {
                        let encoded = if api_key.contains(':') {
                            STANDARD.encode(api_key.as_bytes())
                        } else {
                            api_key.clone()
                        };
                        format!("Basic {}", encoded)
                    }
                    ApiKeyType::Custom => api_key.clone(),
                };

                headers.insert(
                    header_key,
                    header_value.parse().map_err(|err: InvalidHeaderValue| HookflowError::Runtime(err.to_string()))?,
                );
            }
        }
        Ok(())
    }

    /// Parse `custom_headers` into a header map, resolving template variables
    /// in the values, then layer the auth headers on top.
    fn build_headers(
        &self,
        ctx: &Context,
    ) -> Result<HeaderMap> {
        let parsed: Value = serde_json::from_str(self.custom_headers.trim()).map_err(|err| HookflowError::Node(format!("invalid headers JSON: {}", err)))?;
        let map = parsed.as_object().ok_or_else(|| HookflowError::Node("invalid headers JSON: expected an object".to_string()))?;

        let mut headers = HeaderMap::new();
        for (key, value) in map {
            let value = value.as_str().ok_or_else(|| HookflowError::Node(format!("invalid headers JSON: value of '{}' is not a string", key)))?;
            // Resolve header value template
            let resolved_value = template::resolve_template(ctx, value)?;
            headers.insert(
                key.parse::<HeaderName>().map_err(|err| HookflowError::Runtime(err.to_string()))?,
                resolved_value.parse().map_err(|err: InvalidHeaderValue| HookflowError::Runtime(err.to_string()))?,
            );
        }

        self.apply_auth_headers(&mut headers)?;

        Ok(headers)
    }

    /// Parse the `json_data` text and resolve template variables in it.
    fn build_payload(
        &self,
        ctx: &Context,
    ) -> Result<Value> {
        let text = self.json_data.trim();
        if text.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        let parsed: Value = serde_json::from_str(text).map_err(|err| HookflowError::Node(format!("invalid JSON data: {}", err)))?;
        template::resolve_json_value(ctx, &parsed)
    }

    /// Encode the upstream image, if any.
    ///
    /// A conversion failure drops the image with a warning instead of failing
    /// the whole delivery.
    fn encode_image(
        &self,
        inputs: &Vars,
    ) -> Option<Vec<u8>> {
        if self.send_as_json {
            return None;
        }

        let tensor: ImageTensor = inputs.get("images")?;
        match tensor.to_png() {
            Ok(png) => Some(png),
            Err(err) => {
                warn!("failed to convert image: {}", err);
                None
            }
        }
    }
}

#[async_trait]
#[typetag::serde]
impl Node for WebhookNode {
    fn create(params: serde_json::Value) -> Result<Self> {
        jsonschema::validate(&Self::schema(), &params)?;
        let node = serde_json::from_value::<Self>(params)?;
        Ok(node)
    }

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["webhook_url"],
            "properties": {
                "webhook_url": {
                    "type": "string",
                    "description": "Webhook endpoint URL, supports template variables like {{#nodeId.key#}}"
                },
                "json_data": {
                    "type": "string",
                    "default": "{}",
                    "description": "JSON data to send with the webhook, values support template variables"
                },
                "custom_headers": {
                    "type": "string",
                    "default": "{}",
                    "description": "Custom HTTP headers as a JSON object, values support template variables"
                },
                "timeout": {
                    "type": "integer",
                    "minimum": 5,
                    "maximum": 300,
                    "default": 30,
                    "description": "Request timeout in seconds"
                },
                "send_as_json": {
                    "type": "boolean",
                    "default": false,
                    "description": "Send only JSON data, without the image"
                },
                "enabled": {
                    "type": "boolean",
                    "default": true,
                    "description": "Enable webhook delivery"
                },
                "auth": {
                    "type": "object",
                    "required": ["auth_type"],
                    "properties": {
                        "auth_type": {
                            "oneOf": [
                                { "const": "no_auth" },
                                {
                                    "type": "object",
                                    "properties": {
                                        "api_key": {
                                            "type": "string",
                                            "enum": ["basic", "bearer", "custom"]
                                        }
                                    }
                                }
                            ]
                        },
                        "api_key": { "type": ["string", "null"] },
                        "header": { "type": ["string", "null"] }
                    }
                },
                "user_agent": {
                    "type": ["string", "null"],
                    "description": "Override the configured User-Agent header"
                }
            }
        })
    }

    fn node_type(&self) -> NodeType {
        NodeType::Webhook
    }

    async fn run(
        &self,
        ctx: Arc<Context>,
        nid: NodeId,
        inputs: Vars,
    ) -> Result<NodeOutput> {
        if !self.enabled {
            return Ok(NodeOutput::skipped("webhook notification disabled"));
        }

        let mut pbar = ctx.progress(nid, 3);
        pbar.update_absolute(0);

        let url = match template::resolve_template(&ctx, &self.webhook_url) {
            Ok(url) => url,
            Err(err) => return Ok(NodeOutput::failed("Error", err.to_string())),
        };
        if let Err(err) = Url::parse(&url) {
            return Ok(NodeOutput::failed("Error", format!("invalid webhook url '{}': {}", url, err)));
        }

        let payload = match self.build_payload(&ctx) {
            Ok(payload) => payload,
            Err(err) => return Ok(NodeOutput::failed("Error", err.to_string())),
        };
        let headers = match self.build_headers(&ctx) {
            Ok(headers) => headers,
            Err(err) => return Ok(NodeOutput::failed("Error", err.to_string())),
        };
        pbar.update_absolute(1);

        let request = WebhookRequest {
            url,
            image_png: self.encode_image(&inputs),
            payload,
            headers,
            timeout: Duration::from_secs(self.timeout),
            send_as_json: self.send_as_json,
        };
        let sender = WebhookSender::with_user_agent(self.user_agent.clone().unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()));
        pbar.update_absolute(2);

        let output = match sender.send(request).await {
            Ok(report) if report.success => {
                let mut outputs = Vars::new();
                outputs.set(STATUS_KEY, format!("Success ({})", report.status_code));
                outputs.set(RESPONSE_KEY, report.body.clone());
                NodeOutput::succeeded(format!("Success ({})", report.status_code), report.body, outputs)
            }
            Ok(report) => NodeOutput::failed(format!("Failed ({})", report.status_code), report.body),
            Err(err) => NodeOutput::failed("Error", err.to_string()),
        };
        pbar.update_absolute(3);

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use serde_json::json;

    use super::*;
    use crate::runtime::Channel;

    fn create_test_context() -> Arc<Context> {
        static RUNTIME: OnceLock<Arc<tokio::runtime::Runtime>> = OnceLock::new();
        let runtime = RUNTIME.get_or_init(|| Arc::new(tokio::runtime::Runtime::new().unwrap())).clone();
        let channel = Arc::new(Channel::new(runtime));
        Arc::new(Context::new("test-rid".to_string(), channel))
    }

    #[test]
    fn test_create_with_defaults() {
        let node = WebhookNode::create(json!({"webhook_url": "https://example.com/hook"})).unwrap();

        assert_eq!(node.webhook_url, "https://example.com/hook");
        assert_eq!(node.json_data, "{}");
        assert_eq!(node.timeout, 30);
        assert!(node.enabled);
        assert!(!node.send_as_json);
    }

    #[test]
    fn test_create_requires_url() {
        assert!(WebhookNode::create(json!({})).is_err());
    }

    #[test]
    fn test_create_rejects_timeout_out_of_range() {
        let result = WebhookNode::create(json!({
            "webhook_url": "https://example.com/hook",
            "timeout": 301
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_auth_bearer_header() {
        let node = WebhookNode::create(json!({
            "webhook_url": "https://example.com/hook",
            "auth": {"auth_type": {"api_key": "bearer"}, "api_key": "tok"}
        }))
        .unwrap();

        let mut headers = HeaderMap::new();
        node.apply_auth_headers(&mut headers).unwrap();

        assert_eq!(headers.get("Authorization").unwrap(), "Bearer tok");
    }

    #[test]
    fn test_auth_basic_encodes_credentials() {
        let node = WebhookNode::create(json!({
            "webhook_url": "https://example.com/hook",
            "auth": {"auth_type": {"api_key": "basic"}, "api_key": "user:pass", "header": "X-Auth"}
        }))
        .unwrap();

        let mut headers = HeaderMap::new();
        node.apply_auth_headers(&mut headers).unwrap();

        let expected = format!("Basic {}", STANDARD.encode("user:pass"));
        assert_eq!(headers.get("X-Auth").unwrap(), expected.as_str());
    }

    #[test]
    fn test_auth_api_key_required() {
        let node = WebhookNode::create(json!({
            "webhook_url": "https://example.com/hook",
            "auth": {"auth_type": {"api_key": "bearer"}}
        }))
        .unwrap();

        let mut headers = HeaderMap::new();
        assert!(node.apply_auth_headers(&mut headers).is_err());
    }

    #[tokio::test]
    async fn test_run_disabled_skips() {
        let ctx = create_test_context();
        let node = WebhookNode::create(json!({
            "webhook_url": "https://example.com/hook",
            "enabled": false
        }))
        .unwrap();

        let output = node.run(ctx, "hook1".to_string(), Vars::new()).await.unwrap();

        assert_eq!(output.status, crate::nodes::NodeStatus::Skipped);
        assert_eq!(output.response, "webhook notification disabled");
    }

    #[tokio::test]
    async fn test_run_invalid_json_data() {
        let ctx = create_test_context();
        let node = WebhookNode::create(json!({
            "webhook_url": "https://example.com/hook",
            "json_data": "{not json"
        }))
        .unwrap();

        let output = node.run(ctx, "hook1".to_string(), Vars::new()).await.unwrap();

        assert_eq!(output.status, crate::nodes::NodeStatus::Failed);
        assert!(output.response.contains("invalid JSON data"));
    }

    #[tokio::test]
    async fn test_run_invalid_headers_json() {
        let ctx = create_test_context();
        let node = WebhookNode::create(json!({
            "webhook_url": "https://example.com/hook",
            "custom_headers": "[1, 2]"
        }))
        .unwrap();

        let output = node.run(ctx, "hook1".to_string(), Vars::new()).await.unwrap();

        assert_eq!(output.status, crate::nodes::NodeStatus::Failed);
        assert!(output.response.contains("invalid headers JSON"));
    }

    #[tokio::test]
    async fn test_run_invalid_url() {
        let ctx = create_test_context();
        let node = WebhookNode::create(json!({"webhook_url": "not a url"})).unwrap();

        let output = node.run(ctx, "hook1".to_string(), Vars::new()).await.unwrap();

        assert_eq!(output.status, crate::nodes::NodeStatus::Failed);
        assert!(output.response.contains("invalid webhook url"));
    }
}
