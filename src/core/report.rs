use crate::core::Storage;
use crate::domain::model::{DashboardView, Metric};
use crate::domain::table::Table;
use crate::utils::error::Result;
use serde_json::{json, Value};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const REPORT_FILE: &str = "carbon_tax_report.zip";

/// 將儀表板結果打包成 ZIP（CSV + 圖表 JSON）
pub struct ReportExporter<S: Storage> {
    storage: S,
}

impl<S: Storage> ReportExporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn export(&self, view: &DashboardView) -> Result<String> {
        let zip_data = build_bundle(view)?;

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(REPORT_FILE, &zip_data).await?;

        let output_path = self.storage.output_path(REPORT_FILE);
        tracing::info!("📁 Report saved to: {}", output_path);
        Ok(output_path)
    }
}

pub fn build_bundle(view: &DashboardView) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>("metrics.csv", FileOptions::default())?;
    zip.write_all(&metrics_csv(&view.metrics)?)?;

    for tab in &view.tabs {
        let name = format!("{}.csv", tab.title.to_lowercase().replace(' ', "_"));
        zip.start_file::<_, ()>(name, FileOptions::default())?;
        zip.write_all(&table_csv(&tab.table, view.country.tables().label_column)?)?;
    }

    let mut charts = serde_json::Map::new();
    for tab in &view.tabs {
        charts.insert(tab.title.clone(), serde_json::to_value(&tab.chart)?);
    }
    let document = json!({
        "country": view.country,
        "heading": view.heading,
        "generated_at": view.generated_at,
        "charts": charts,
    });
    zip.start_file::<_, ()>("charts.json", FileOptions::default())?;
    zip.write_all(serde_json::to_string_pretty(&document)?.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn metrics_csv(metrics: &[Metric]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["metric", "value", "display"])?;
    for metric in metrics {
        let value = metric.value.to_string();
        writer.write_record([
            metric.label.as_str(),
            value.as_str(),
            metric.display.as_str(),
        ])?;
    }
    into_bytes(writer)
}

fn table_csv(table: &Table, index_label: &str) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![index_label.to_string()];
    header.extend(table.columns().iter().cloned());
    writer.write_record(&header)?;

    for (label, values) in table.rows() {
        let mut record = vec![label.to_string()];
        record.extend(values.iter().map(cell_text));
        writer.write_record(&record)?;
    }
    into_bytes(writer)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| crate::utils::error::DashboardError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dashboard::build_view;
    use crate::domain::model::{Country, EngineOutputs};
    use crate::utils::error::DashboardError;
    use std::collections::HashMap;
    use std::io::Read;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                DashboardError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn output_path(&self, path: &str) -> String {
            format!("memory://{}", path)
        }
    }

    fn sample_view() -> DashboardView {
        let scope_rows = |label: &str| {
            json!([
                {label: crate::core::chart::SCOPE_1, "2023": 100, "2024": 110},
                {label: crate::core::chart::SCOPE_2, "2023": 50, "2024": null},
                {label: crate::core::chart::SCOPE_3, "2023": 20, "2024": 25}
            ])
        };
        let mut outputs: EngineOutputs = json!({
            "1_ECR": 1.0,
            "2_NECR": 2.0,
            "3_Total_Carbon_Tax": 3.0,
            "4_Max_Offset_Amt": 4.0,
            "Carbon_Credit_Units": 5.0,
            "5_Carbon_Nett_Tax": 6.0
        })
        .as_object()
        .cloned()
        .unwrap();
        for country in Country::ALL {
            let keys = country.tables();
            outputs.insert(keys.amount_key.to_string(), scope_rows(keys.label_column));
            outputs.insert(keys.projection_key.to_string(), scope_rows(keys.label_column));
        }
        build_view(Country::Germany, &outputs).unwrap()
    }

    #[tokio::test]
    async fn test_export_writes_bundle() {
        let storage = MockStorage::new();
        let exporter = ReportExporter::new(storage.clone());

        let path = exporter.export(&sample_view()).await.unwrap();
        assert_eq!(path, "memory://carbon_tax_report.zip");

        let data = storage.read_file(REPORT_FILE).await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "metrics.csv",
                "carbon_tax_amount.csv",
                "carbon_tax_projections.csv",
                "charts.json"
            ]
        );

        let mut amount = String::new();
        archive
            .by_name("carbon_tax_amount.csv")
            .unwrap()
            .read_to_string(&mut amount)
            .unwrap();
        let mut lines = amount.lines();
        assert!(lines
            .next()
            .unwrap()
            .starts_with("Carbon Tax Germany,\"Scope 1 Combustions"));
        assert!(lines.next().unwrap().starts_with("2023,100,50,20"));
        assert_eq!(lines.next().unwrap(), "2024,110,,25");
    }

    #[test]
    fn test_metrics_csv_has_six_rows() {
        let csv_bytes = metrics_csv(&sample_view().metrics).unwrap();
        let text = String::from_utf8(csv_bytes).unwrap();
        assert_eq!(text.lines().count(), 7);
        assert!(text.contains("Total Carbon Tax,3,$3.00"));
    }
}
