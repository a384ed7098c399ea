use crate::config::toml_config::EngineConfig;
use crate::utils::error::{DashboardError, Result};
use std::env;
use std::str::FromStr;

/// 部署平台（Lambda）以環境變數提供的引擎設定
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub engine: EngineConfig,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();
        Ok(Self {
            engine: EngineConfig {
                endpoint: lookup("SPARK_ENDPOINT").unwrap_or(defaults.endpoint),
                tenant_name: lookup("SPARK_TENANT_NAME").unwrap_or(defaults.tenant_name),
                synthetic_key: lookup("SPARK_SYNTHETIC_KEY").unwrap_or(defaults.synthetic_key),
                timeout_seconds: parse_var(&lookup, "SPARK_TIMEOUT_SECONDS")?
                    .unwrap_or(defaults.timeout_seconds),
                retry_attempts: parse_var(&lookup, "SPARK_RETRY_ATTEMPTS")?
                    .unwrap_or(defaults.retry_attempts),
                retry_delay_ms: parse_var(&lookup, "SPARK_RETRY_DELAY_MS")?
                    .unwrap_or(defaults.retry_delay_ms),
            },
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| DashboardError::InvalidConfigValueError {
                field: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}
