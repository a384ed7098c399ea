use crate::core::{ConfigProvider, EngineClient};
use crate::domain::model::{EngineOutputs, RequestParameters};
use crate::utils::error::{DashboardError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct EngineRequest<'a> {
    request_data: RequestData<'a>,
}

#[derive(Debug, Serialize)]
struct RequestData<'a> {
    inputs: &'a RequestParameters,
}

/// Spark 計算引擎的 HTTP 客戶端
pub struct SparkEngineClient<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> SparkEngineClient<C> {
    pub fn new(config: C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DashboardError::ConfigError {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { config, client })
    }

    /// 送出請求；只有連線失敗或逾時才重試
    async fn send_with_retry(&self, body: &EngineRequest<'_>) -> Result<Response> {
        let max_retries = self.config.retry_attempts();
        let mut attempt = 0;

        loop {
            tracing::debug!(
                "📡 POST {} (attempt {}/{})",
                self.config.endpoint(),
                attempt + 1,
                max_retries + 1
            );

            let result = self
                .client
                .post(self.config.endpoint())
                .header(CONTENT_TYPE, "application/json")
                .header("x-tenant-name", self.config.tenant_name())
                .header("x-synthetic-key", self.config.synthetic_key())
                .json(body)
                .send()
                .await;

            match result {
                Ok(response) => return Ok(response),
                Err(e) if is_transient(&e) && attempt < max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "⚠️ Engine request failed ({}), retrying in {:?}",
                        e,
                        self.config.retry_delay()
                    );
                    tokio::time::sleep(self.config.retry_delay()).await;
                }
                Err(e) => {
                    return Err(DashboardError::unavailable(format!(
                        "request to {} failed: {}",
                        self.config.endpoint(),
                        e
                    )))
                }
            }
        }
    }
}

#[async_trait]
impl<C: ConfigProvider> EngineClient for SparkEngineClient<C> {
    async fn invoke(&self, params: &RequestParameters) -> Result<EngineOutputs> {
        let body = EngineRequest {
            request_data: RequestData { inputs: params },
        };

        tracing::info!("📡 Calling calculation engine for {}", params.country);
        let response = self.send_with_retry(&body).await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        // 非 2xx 直接失敗，不讀取內容結構
        if !status.is_success() {
            return Err(DashboardError::unavailable(format!(
                "engine responded with HTTP {}",
                status
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DashboardError::unavailable(format!("failed to read body: {}", e)))?;

        let outputs = extract_outputs(&text)?;
        tracing::info!("✅ Engine returned {} outputs", outputs.len());
        Ok(outputs)
    }
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout()
}

/// 解析回應內容並取出 `response_data.outputs`
pub fn extract_outputs(body: &str) -> Result<EngineOutputs> {
    let mut value: Value = serde_json::from_str(body)
        .map_err(|e| DashboardError::malformed(format!("response is not JSON: {}", e)))?;

    match value.pointer_mut("/response_data/outputs").map(Value::take) {
        Some(Value::Object(outputs)) => Ok(outputs),
        Some(other) => Err(DashboardError::malformed(format!(
            "response_data.outputs is not an object: {}",
            other
        ))),
        None => Err(DashboardError::malformed(
            "response has no response_data.outputs",
        )),
    }
}
