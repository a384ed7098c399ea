pub mod chart;
pub mod dashboard;
pub mod engine_client;
pub mod report;
pub mod reshape;

pub use crate::domain::model::{EngineOutputs, RequestParameters};
pub use crate::domain::ports::{ConfigProvider, EngineClient, Storage};
pub use crate::utils::error::Result;
