mod models;
mod node;

pub use models::{ApiKeyType, AuthorizationConfig, AuthorizationType};
pub use node::WebhookNode;
