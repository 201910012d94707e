use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub activation: ActivationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_poll_max_attempts")]
    pub max_attempts: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActivationConfig {
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_poll_max_attempts() -> u32 {
    120
}

fn default_settle_delay_ms() -> u64 {
    2_000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            max_attempts: default_poll_max_attempts(),
        }
    }
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment file, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `VEIL__API__BASE_URL=https://...`
            .add_source(config::Environment::with_prefix("VEIL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_sections_fall_back_to_reference_behavior() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{"api":{"base_url":"https://veil.example/api/v1/"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.api.timeout_secs, 15);
        assert_eq!(cfg.polling.interval_ms, 1_000);
        assert_eq!(cfg.polling.max_attempts, 120);
        assert_eq!(cfg.activation.settle_delay_ms, 2_000);
    }
}
