use std::{fs, path::Path};

use serde::Deserialize;

use crate::{HookflowError, Result};

/// Default User-Agent applied when a webhook request carries none.
pub const DEFAULT_USER_AGENT: &str = "hookflow/0.1";
/// Default progress tick for the delay node, in milliseconds.
pub const DEFAULT_DELAY_TICK: u64 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// webhook delivery config
    #[serde(default)]
    pub http: HttpConfig,
    /// delay node config
    #[serde(default)]
    pub delay: DelayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent when headers carry none
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DelayConfig {
    /// progress tick in milliseconds, range [10, 60000]
    #[serde(default = "default_delay_tick")]
    pub tick: u64,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_delay_tick() -> u64 {
    DEFAULT_DELAY_TICK
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            delay: DelayConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            tick: default_delay_tick(),
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| HookflowError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str).map_err(|e| HookflowError::Config(e.to_string()))?;

        if config.delay.tick < 10 || config.delay.tick > 60_000 {
            return Err(HookflowError::Config(format!("delay.tick {} out of range [10, 60000]", config.delay.tick)));
        }

        Ok(config)
    }
}
