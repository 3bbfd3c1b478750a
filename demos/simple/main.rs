use std::sync::Arc;

use hookflow::{Channel, ChannelEvent, ChannelOptions, Config, Context, NodeRegistry, Vars, utils};
use serde_json::json;

fn main() {
    let runtime = Arc::new(tokio::runtime::Runtime::new().unwrap());

    let channel = Arc::new(Channel::new(runtime.clone()));
    channel.listen();

    let registry = NodeRegistry::with_defaults(Config::default());
    let ctx = Arc::new(Context::new(utils::longid(), channel.clone()));

    ChannelEvent::channel(channel.clone(), ChannelOptions::with_rid(ctx.rid())).on_log(|log| {
        println!("[{}] {}", log.nid, log.content);
    });

    let progress = channel.progress();
    std::thread::spawn(move || {
        while let Some(update) = progress.next() {
            println!("progress {}: {}/{}", update.nid, update.value, update.total);
        }
    });

    let output = runtime.block_on(async {
        let mut inputs = Vars::new();
        inputs.set("trigger", true);
        inputs.set("image_id", "demo-42");

        let gate = hookflow::invoke(&registry, ctx.clone(), "gate1".to_string(), "trigger", json!({}), inputs).await.unwrap();
        println!("{}: {}", gate.summary, gate.response);

        hookflow::invoke(&registry, ctx.clone(), "wait1".to_string(), "delay", json!({"duration": 500}), gate.outputs.clone()).await.unwrap();

        let params = json!({
            "webhook_url": "https://httpbin.org/post",
            "json_data": r#"{"caption": "render finished", "image_id": "{{#gate1.image_id#}}"}"#,
            "send_as_json": true
        });
        hookflow::invoke(&registry, ctx.clone(), "hook1".to_string(), "webhook", params, Vars::new()).await.unwrap()
    });

    println!("{}: {}", output.summary, output.response);

    channel.shutdown();
}
