use std::sync::{Arc, OnceLock};

use httpmock::prelude::*;
use serde_json::json;

use hookflow::{Channel, Config, Context, ImageTensor, NodeRegistry, NodeStatus, Vars, invoke, utils};

fn create_context() -> Arc<Context> {
    static RUNTIME: OnceLock<Arc<tokio::runtime::Runtime>> = OnceLock::new();
    let runtime = RUNTIME.get_or_init(|| Arc::new(tokio::runtime::Runtime::new().unwrap())).clone();
    let channel = Arc::new(Channel::new(runtime));
    Arc::new(Context::new(utils::longid(), channel))
}

#[tokio::test]
async fn json_branch_delivers_payload() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hook")
                .header("content-type", "application/json")
                .header("user-agent", "hookflow/0.1")
                .json_body(json!({"caption": "done", "seed": 42}));
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;

    let registry = NodeRegistry::with_defaults(Config::default());
    let ctx = create_context();

    let params = json!({
        "webhook_url": server.url("/hook"),
        "json_data": r#"{"caption": "done", "seed": 42}"#,
        "send_as_json": true
    });
    let output = invoke(&registry, ctx, "hook1".to_string(), "webhook", params, Vars::new()).await.unwrap();

    assert_eq!(output.status, NodeStatus::Succeeded);
    assert_eq!(output.summary, "Success (200)");
    assert!(output.response.contains("ok"));
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn multipart_branch_carries_image_and_payload() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hook")
                .body_contains(r#"name="image"; filename="image.png""#)
                .body_contains(r#"name="payload""#)
                .body_contains(r#"{"caption":"done"}"#);
            then.status(200).body("received");
        })
        .await;

    let registry = NodeRegistry::with_defaults(Config::default());
    let ctx = create_context();

    let mut inputs = Vars::new();
    inputs.set("images", ImageTensor::new(vec![1, 2, 2, 3], vec![0.5; 12]).unwrap());

    let params = json!({
        "webhook_url": server.url("/hook"),
        "json_data": r#"{"caption": "done"}"#
    });
    let output = invoke(&registry, ctx, "hook1".to_string(), "webhook", params, inputs).await.unwrap();

    assert_eq!(output.status, NodeStatus::Succeeded);
    assert_eq!(output.response, "received");
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn multipart_branch_without_image_still_posts_payload() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook").body_contains(r#"name="payload""#);
            then.status(204);
        })
        .await;

    let registry = NodeRegistry::with_defaults(Config::default());
    let ctx = create_context();

    let params = json!({
        "webhook_url": server.url("/hook"),
        "json_data": r#"{"caption": "done"}"#
    });
    let output = invoke(&registry, ctx, "hook1".to_string(), "webhook", params, Vars::new()).await.unwrap();

    assert_eq!(output.status, NodeStatus::Succeeded);
    assert_eq!(output.summary, "Success (204)");
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn error_status_maps_to_failed_output() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(500).body("boom");
        })
        .await;

    let registry = NodeRegistry::with_defaults(Config::default());
    let ctx = create_context();

    let params = json!({
        "webhook_url": server.url("/hook"),
        "send_as_json": true
    });
    let output = invoke(&registry, ctx, "hook1".to_string(), "webhook", params, Vars::new()).await.unwrap();

    assert_eq!(output.status, NodeStatus::Failed);
    assert_eq!(output.summary, "Failed (500)");
    assert_eq!(output.response, "boom");
}

#[tokio::test]
async fn unreachable_endpoint_maps_to_error_output() {
    let registry = NodeRegistry::with_defaults(Config::default());
    let ctx = create_context();

    // nothing listens here
    let params = json!({
        "webhook_url": "http://127.0.0.1:9/hook",
        "send_as_json": true,
        "timeout": 5
    });
    let output = invoke(&registry, ctx, "hook1".to_string(), "webhook", params, Vars::new()).await.unwrap();

    assert_eq!(output.status, NodeStatus::Failed);
    assert_eq!(output.summary, "Error");
    assert!(!output.response.is_empty());
}

#[tokio::test]
async fn disabled_node_sends_nothing() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(200);
        })
        .await;

    let registry = NodeRegistry::with_defaults(Config::default());
    let ctx = create_context();

    let params = json!({
        "webhook_url": server.url("/hook"),
        "enabled": false
    });
    let output = invoke(&registry, ctx, "hook1".to_string(), "webhook", params, Vars::new()).await.unwrap();

    assert_eq!(output.status, NodeStatus::Skipped);
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn auth_and_templates_resolve_before_delivery() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hook")
                .header("Authorization", "Bearer tok")
                .header("X-Pipeline", "img-gen")
                .json_body(json!({"image_id": "abc"}));
            then.status(200);
        })
        .await;

    let registry = NodeRegistry::with_defaults(Config::default());
    let ctx = create_context();
    ctx.env().set("PIPELINE".to_string(), "img-gen".to_string());

    let mut generated = Vars::new();
    generated.set("id", "abc");
    ctx.add_output("gen".to_string(), generated);

    let params = json!({
        "webhook_url": server.url("/hook"),
        "json_data": r#"{"image_id": "{{#gen.id#}}"}"#,
        "custom_headers": r#"{"X-Pipeline": "{{$PIPELINE$}}"}"#,
        "send_as_json": true,
        "auth": {"auth_type": {"api_key": "bearer"}, "api_key": "tok"}
    });
    let output = invoke(&registry, ctx, "hook1".to_string(), "webhook", params, Vars::new()).await.unwrap();

    assert_eq!(output.status, NodeStatus::Succeeded);
    assert_eq!(mock.hits_async().await, 1);
}
