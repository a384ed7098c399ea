#![allow(dead_code)]

use carbon_tax_dashboard::core::chart::{SCOPE_1, SCOPE_2, SCOPE_3};
use carbon_tax_dashboard::{Country, EngineConfig};
use serde_json::{json, Map, Value};

/// 某國的 CTA/CTP 列資料；每個國家的數值不同，以便辨識路由
pub fn scope_rows(label_column: &str, base: f64) -> Value {
    json!([
        {label_column: SCOPE_1, "2023": base, "2024": base + 5.0, "2025": base + 10.0},
        {label_column: SCOPE_2, "2023": base / 2.0, "2024": base / 2.0 + 5.0, "2025": base / 2.0 + 10.0},
        {label_column: SCOPE_3, "2023": base / 5.0, "2024": base / 5.0 + 5.0, "2025": base / 5.0 + 10.0}
    ])
}

pub fn country_base(country: Country) -> f64 {
    match country {
        Country::France => 1000.0,
        Country::Germany => 2000.0,
        Country::Italy => 3000.0,
        Country::Switzerland => 4000.0,
    }
}

/// 模擬引擎的完整 `response_data.outputs`
pub fn engine_outputs() -> Map<String, Value> {
    let mut outputs = json!({
        "1_ECR": 22.0,
        "2_NECR": 21.68,
        "3_Total_Carbon_Tax": 19931.56,
        "4_Max_Offset_Amt": 1395.2092,
        "Carbon_Credit_Units": 305.3,
        "5_Carbon_Nett_Tax": 18536.3508
    })
    .as_object()
    .cloned()
    .unwrap_or_default();

    for country in Country::ALL {
        let keys = country.tables();
        let base = country_base(country);
        outputs.insert(keys.amount_key.to_string(), scope_rows(keys.label_column, base));
        outputs.insert(
            keys.projection_key.to_string(),
            scope_rows(keys.label_column, base + 400.0),
        );
    }
    outputs
}

pub fn engine_response() -> Value {
    json!({
        "status": "Success",
        "response_data": { "outputs": Value::Object(engine_outputs()) },
        "response_meta": { "service_id": "controller-v1" }
    })
}

pub fn engine_config(endpoint: String) -> EngineConfig {
    EngineConfig {
        endpoint,
        timeout_seconds: 5,
        retry_delay_ms: 10,
        ..EngineConfig::default()
    }
}
