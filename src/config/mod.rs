pub mod cli;
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::InputForm;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::{EngineConfig, TomlConfig};

/// 命令列介面：對應原本側邊欄的表單欄位與預設值
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "carbon-tax-dashboard")]
#[command(about = "Carbon tax and credit offset calculations backed by a remote Spark engine")]
pub struct CliConfig {
    /// France, Germany, Italy or Switzerland
    #[arg(long, default_value = "France")]
    pub country: String,

    /// Average amount of CO2 emitted (tonne), at least 905.98
    #[arg(long, default_value_t = 905.98)]
    pub co2_emitted: f64,

    /// Fuel excise tax, 0-100 per tCO2e
    #[arg(long, default_value_t = 20.0)]
    pub fuel_excise_tax: f64,

    /// Carbon tax, 0-10 per tCO2e
    #[arg(long, default_value_t = 2.0)]
    pub carbon_tax: f64,

    #[arg(long, default_value_t = 0.0)]
    pub ets_permit_price: f64,

    /// Fossil fuel subsidy, at least 0.10
    #[arg(long, default_value_t = 0.10)]
    pub fossil_fuel_subsidy: f64,

    /// Carbon credits price, 0-50 per tCO2e
    #[arg(long, default_value_t = 4.57)]
    pub carbon_credit_price: f64,

    /// Offset cap / limit in percent, 0-100
    #[arg(long, default_value_t = 7.0)]
    pub offset_cap: f64,

    /// Engine settings (TOML)
    #[arg(long)]
    pub config: Option<String>,

    /// Override the engine endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Write the report bundle into this directory
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn form(&self) -> InputForm {
        InputForm {
            country: self.country.clone(),
            co2_emitted: self.co2_emitted,
            fuel_excise_tax: self.fuel_excise_tax,
            carbon_tax: self.carbon_tax,
            ets_permit_price: self.ets_permit_price,
            fossil_fuel_subsidy: self.fossil_fuel_subsidy,
            carbon_credit_price: self.carbon_credit_price,
            offset_cap_percent: self.offset_cap,
        }
    }

    fn toml_config(&self) -> Result<TomlConfig> {
        match &self.config {
            Some(path) => TomlConfig::from_file(path),
            None => Ok(TomlConfig::default()),
        }
    }

    /// 設定檔 → 命令列覆蓋 → 驗證
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut engine = self.toml_config()?.engine_config();

        if let Some(endpoint) = &self.endpoint {
            engine.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            engine.timeout_seconds = timeout;
        }

        engine.validate()?;
        Ok(engine)
    }

    pub fn resolved_output_path(&self) -> Result<Option<String>> {
        if self.output_path.is_some() {
            return Ok(self.output_path.clone());
        }
        Ok(self.toml_config()?.output_path().map(str::to_string))
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form_defaults() {
        let config = CliConfig::parse_from(["carbon-tax-dashboard"]);
        assert_eq!(config.form(), InputForm::default());
        assert!(config.output_path.is_none());
    }

    #[test]
    fn test_overrides_apply_to_engine_config() {
        let config = CliConfig::parse_from([
            "carbon-tax-dashboard",
            "--country",
            "Italy",
            "--offset-cap",
            "12.5",
            "--endpoint",
            "http://127.0.0.1:9000/Execute",
            "--timeout-seconds",
            "3",
        ]);

        let form = config.form();
        assert_eq!(form.country, "Italy");
        assert_eq!(form.offset_cap_percent, 12.5);

        let engine = config.engine_config().unwrap();
        assert_eq!(engine.endpoint, "http://127.0.0.1:9000/Execute");
        assert_eq!(engine.timeout_seconds, 3);
    }

    #[test]
    fn test_invalid_endpoint_override_fails() {
        let config =
            CliConfig::parse_from(["carbon-tax-dashboard", "--endpoint", "not a url"]);
        assert!(config.engine_config().is_err());
    }
}
