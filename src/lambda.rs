#[cfg(feature = "lambda")]
use carbon_tax_dashboard::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use carbon_tax_dashboard::{Dashboard, DashboardView, InputForm, LambdaConfig, SparkEngineClient};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<InputForm>) -> Result<DashboardView, Error> {
    tracing::info!("Starting carbon tax Lambda function");

    let lambda_config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    lambda_config
        .engine
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let client = SparkEngineClient::new(lambda_config.engine)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    let dashboard = Dashboard::new(client);

    let view = dashboard.render(&event.payload).await.map_err(|e| {
        tracing::error!(
            "❌ Render failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        Box::new(e) as Box<dyn std::error::Error + Send + Sync>
    })?;

    tracing::info!("Carbon tax Lambda function completed for {}", view.country);
    Ok(view)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
