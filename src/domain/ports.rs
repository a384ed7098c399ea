use crate::domain::model::{EngineOutputs, RequestParameters};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn output_path(&self, path: &str) -> String;
}

/// 計算引擎的連線設定
pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn tenant_name(&self) -> &str;
    fn synthetic_key(&self) -> &str;
    fn timeout(&self) -> Duration;
    fn retry_attempts(&self) -> u32;
    fn retry_delay(&self) -> Duration;
}

#[async_trait]
pub trait EngineClient: Send + Sync {
    /// 呼叫一次引擎並回傳 `response_data.outputs`
    async fn invoke(&self, params: &RequestParameters) -> Result<EngineOutputs>;
}
