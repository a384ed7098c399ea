use crate::core::ConfigProvider;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str =
    "https://excel.uat.us.coherent.global/coherent/api/v3/folders/ESG/services/Controller v1/Execute";
pub const DEFAULT_TENANT: &str = "coherent";
pub const DEFAULT_SYNTHETIC_KEY: &str = "eecee262-6c42-4219-beb7-19362ef9697b";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 1;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// TOML 設定檔格式，所有欄位皆可省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub engine: EngineSection,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSection {
    pub endpoint: Option<String>,
    pub tenant_name: Option<String>,
    pub synthetic_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
}

/// 解析後的引擎連線設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub endpoint: String,
    pub tenant_name: String,
    pub synthetic_key: String,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            tenant_name: DEFAULT_TENANT.to_string(),
            synthetic_key: DEFAULT_SYNTHETIC_KEY.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashboardError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SPARK_SYNTHETIC_KEY})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 以預設值補齊未設定的欄位
    pub fn engine_config(&self) -> EngineConfig {
        let defaults = EngineConfig::default();
        let section = &self.engine;
        EngineConfig {
            endpoint: section.endpoint.clone().unwrap_or(defaults.endpoint),
            tenant_name: section.tenant_name.clone().unwrap_or(defaults.tenant_name),
            synthetic_key: section.synthetic_key.clone().unwrap_or(defaults.synthetic_key),
            timeout_seconds: section.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            retry_attempts: section.retry_attempts.unwrap_or(defaults.retry_attempts),
            retry_delay_ms: section.retry_delay_ms.unwrap_or(defaults.retry_delay_ms),
        }
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.path.as_deref())
    }
}

impl ConfigProvider for EngineConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn tenant_name(&self) -> &str {
        &self.tenant_name
    }

    fn synthetic_key(&self) -> &str {
        &self.synthetic_key
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<()> {
        validate_url("engine.endpoint", &self.endpoint)?;
        validate_non_empty_string("engine.tenant_name", &self.tenant_name)?;
        validate_non_empty_string("engine.synthetic_key", &self.synthetic_key)?;
        if self.synthetic_key.contains("${") {
            return Err(DashboardError::ConfigError {
                message: format!(
                    "engine.synthetic_key references an unset environment variable: {}",
                    self.synthetic_key
                ),
            });
        }
        validate_positive_number("engine.timeout_seconds", self.timeout_seconds, 1)?;
        // 只允許一次重試
        validate_range("engine.retry_attempts", self.retry_attempts, 0, 1)?;
        validate_range("engine.retry_delay_ms", self.retry_delay_ms, 0, 10_000)?;
        Ok(())
    }
}
