use crate::domain::chart::{BarMode, BarTrace, ChartLayout, ChartSpec, ChartTitle, Marker};
use crate::domain::table::Table;
use crate::utils::error::{DashboardError, Result};
use serde_json::Value;

pub const SCOPE_1: &str = "Scope 1 Combustions (Stationary, Mobile and Refrigerants)";
pub const SCOPE_2: &str = "Scope 2 Combustions (Purchased Electricity)";
pub const SCOPE_3: &str = "Scope 3 (Transportations)";

/// 圖表固定的三個系列與其顏色
pub const SCOPE_SERIES: [(&str, &str); 3] = [
    (SCOPE_1, "crimson"),
    (SCOPE_2, "lightslategrey"),
    (SCOPE_3, "cornflowerblue"),
];

const CHART_WIDTH: u32 = 1200;
const CHART_HEIGHT: u32 = 600;
const BAR_GROUP_GAP: f64 = 0.1;

/// 以三個 scope 系列產生分組長條圖（每個 x 值一組，每組三根）。
///
/// 系列優先從欄位讀取；若欄位沒有而索引有，則以轉置方向讀取。
pub fn render_grouped_bars(title: &str, table: &Table) -> Result<ChartSpec> {
    let oriented;
    let table = if has_all_series(table.columns()) {
        table
    } else if has_all_series(table.index()) {
        oriented = table.transpose();
        &oriented
    } else {
        let missing: Vec<&str> = SCOPE_SERIES
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| !table.columns().iter().any(|c| c == name))
            .collect();
        return Err(DashboardError::malformed(format!(
            "table for '{}' is missing series: {}",
            title,
            missing.join(", ")
        )));
    };

    let x: Vec<String> = table.index().to_vec();
    let mut data = Vec::with_capacity(SCOPE_SERIES.len());

    for (name, color) in SCOPE_SERIES {
        let column = table
            .column(name)
            .ok_or_else(|| DashboardError::malformed(format!("missing series '{}'", name)))?;
        let y: Vec<Option<f64>> = column.into_iter().map(numeric).collect();
        let text = y
            .iter()
            .map(|v| v.map(format_abbreviated_currency).unwrap_or_default())
            .collect();

        data.push(BarTrace {
            kind: "bar".to_string(),
            name: name.to_string(),
            x: x.clone(),
            y,
            text,
            textposition: "outside".to_string(),
            marker: Marker {
                color: color.to_string(),
            },
        });
    }

    tracing::debug!("📊 Rendered '{}' with {} groups", title, x.len());

    Ok(ChartSpec {
        data,
        layout: ChartLayout {
            title: ChartTitle {
                text: title.to_string(),
            },
            barmode: BarMode::Group,
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            bargroupgap: BAR_GROUP_GAP,
        },
    })
}

fn has_all_series(labels: &[String]) -> bool {
    SCOPE_SERIES
        .iter()
        .all(|(name, _)| labels.iter().any(|l| l == name))
}

/// 數字或數字字串才畫得出長條，其餘留空
fn numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// 三位有效數字加 SI 前綴的金額，例如 `$1.23M`、`$50.0`、`$100`
pub fn format_abbreviated_currency(value: f64) -> String {
    const SIGNIFICANT: i32 = 3;

    if value == 0.0 {
        return "$0.00".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    // 先四捨五入到有效位數，再決定指數（999.6 → 1.00k）
    let mut exponent = magnitude.log10().floor() as i32;
    let shift = SIGNIFICANT - 1 - exponent;
    let rounded = if shift >= 0 {
        let scale = 10f64.powi(shift);
        (magnitude * scale).round() / scale
    } else {
        let scale = 10f64.powi(-shift);
        (magnitude / scale).round() * scale
    };
    if rounded >= 10f64.powi(exponent + 1) {
        exponent += 1;
    }

    let tier = exponent.div_euclid(3).clamp(-8, 8);
    let scaled = if tier >= 0 {
        rounded / 10f64.powi(tier * 3)
    } else {
        rounded * 10f64.powi(-tier * 3)
    };
    let decimals = (SIGNIFICANT - 1 - (exponent - tier * 3)).max(0) as usize;
    let prefix = SI_PREFIXES[(tier + 8) as usize];

    format!("{}${:.*}{}", sign, decimals, scaled, prefix)
}
