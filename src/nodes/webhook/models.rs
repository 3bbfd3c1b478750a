use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationType {
    NoAuth,
    ApiKey(ApiKeyType),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyType {
    Basic,
    Bearer,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    pub auth_type: AuthorizationType,
    pub api_key: Option<String>,
    pub header: Option<String>,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            auth_type: AuthorizationType::NoAuth,
            api_key: None,
            header: None,
        }
    }
}
