use carbon_tax_dashboard::utils::error::{DashboardError, ErrorSeverity};
use carbon_tax_dashboard::utils::logger;
use carbon_tax_dashboard::{
    CliConfig, Dashboard, DashboardView, LocalStorage, ReportExporter, SparkEngineClient,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting carbon-tax-dashboard CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        report_failure(&e);
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<(), DashboardError> {
    let engine_config = config.engine_config()?;
    let output_path = config.resolved_output_path()?;

    let client = SparkEngineClient::new(engine_config)?;
    let dashboard = Dashboard::new(client);

    let view = dashboard.render(&config.form()).await?;
    print_view(&view);

    if let Some(path) = output_path {
        let exporter = ReportExporter::new(LocalStorage::new(path));
        let saved = exporter.export(&view).await?;
        println!("📁 Report saved to: {}", saved);
    }

    Ok(())
}

fn print_view(view: &DashboardView) {
    println!("{}", view.heading);
    println!();
    for metric in &view.metrics {
        println!("  {:<32} {:>16}", metric.label, metric.display);
    }

    for tab in &view.tabs {
        println!();
        println!("{}", tab.title);
        for group in tab.chart.groups() {
            let bars: Vec<String> = tab
                .chart
                .bars_in_group(group)
                .iter()
                .map(|bar| if bar.text.is_empty() { "-" } else { bar.text }.to_string())
                .collect();
            println!("  {:<12} {}", group, bars.join("  "));
        }
    }
}

fn report_failure(e: &DashboardError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Render failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,   // 可重試
        ErrorSeverity::High => 1,     // 輸入或回應錯誤
        ErrorSeverity::Critical => 3, // 輸出失敗
    };
    std::process::exit(exit_code);
}
