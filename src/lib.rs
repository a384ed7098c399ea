pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::lambda::LambdaConfig;
pub use config::toml_config::{EngineConfig, TomlConfig};
pub use crate::core::{
    chart::render_grouped_bars, dashboard::Dashboard, engine_client::SparkEngineClient,
    report::ReportExporter, reshape::reshape_table,
};
pub use domain::model::{Country, DashboardView, InputForm, RequestParameters};
pub use utils::error::{DashboardError, Result};
