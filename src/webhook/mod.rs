mod sender;

pub use sender::{DeliveryReport, WebhookRequest, WebhookSender};
