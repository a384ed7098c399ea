use crate::domain::model::EngineOutputs;
use crate::domain::table::Table;
use crate::utils::error::{DashboardError, Result};
use serde_json::Value;

/// 將列導向的引擎表格轉置：`label_column` 的值成為欄位，其餘欄位成為列。
///
/// 欄位順序依資料中首次出現的順序，缺漏的儲存格補 `null`，不丟棄任何值。
pub fn reshape_table(raw_rows: &Value, label_column: &str) -> Result<Table> {
    let rows = raw_rows.as_array().ok_or_else(|| {
        DashboardError::malformed(format!(
            "table keyed by '{}' is not an array of rows",
            label_column
        ))
    })?;

    let mut labels = Vec::with_capacity(rows.len());
    let mut series: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| {
            DashboardError::malformed(format!("row {} of '{}' is not an object", i, label_column))
        })?;
        let label = obj.get(label_column).ok_or_else(|| {
            DashboardError::malformed(format!("row {} is missing '{}'", i, label_column))
        })?;
        labels.push(label_text(label).ok_or_else(|| {
            DashboardError::malformed(format!(
                "row {} has an unusable '{}' value: {}",
                i, label_column, label
            ))
        })?);

        for key in obj.keys() {
            if key != label_column && !series.contains(key) {
                series.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let cells = series
        .iter()
        .map(|name| {
            objects
                .iter()
                .map(|obj| obj.get(name).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Table::from_parts(series, labels, cells)
}

/// 從引擎輸出取出指定表格並轉置
pub fn reshape_output(outputs: &EngineOutputs, key: &str, label_column: &str) -> Result<Table> {
    let raw = outputs
        .get(key)
        .ok_or_else(|| DashboardError::malformed(format!("missing output table '{}'", key)))?;
    let table = reshape_table(raw, label_column)?;
    tracing::debug!(
        "🔄 Reshaped '{}': {} rows x {} columns",
        key,
        table.index().len(),
        table.columns().len()
    );
    Ok(table)
}

fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
