use crate::domain::chart::ChartSpec;
use crate::domain::table::Table;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{
    validate_input_at_least, validate_input_non_negative, validate_input_range, Validate,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 引擎回傳的 `response_data.outputs`，保持原始鍵順序
pub type EngineOutputs = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    France,
    Germany,
    Italy,
    Switzerland,
}

/// 每個國家在引擎輸出中的兩張表與其標籤欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryTables {
    pub amount_key: &'static str,
    pub projection_key: &'static str,
    pub label_column: &'static str,
}

impl Country {
    pub const ALL: [Country; 4] = [
        Country::France,
        Country::Germany,
        Country::Italy,
        Country::Switzerland,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Country::France => "France",
            Country::Germany => "Germany",
            Country::Italy => "Italy",
            Country::Switzerland => "Switzerland",
        }
    }

    pub fn tables(&self) -> CountryTables {
        match self {
            Country::France => CountryTables {
                amount_key: "FranceCTA",
                projection_key: "FranceCTP",
                label_column: "Carbon Tax France",
            },
            Country::Germany => CountryTables {
                amount_key: "GermanyCTA",
                projection_key: "GermanyCTP",
                label_column: "Carbon Tax Germany",
            },
            Country::Italy => CountryTables {
                amount_key: "ItalyCTA",
                projection_key: "ItalyCTP",
                label_column: "Carbon Tax Italy",
            },
            // 引擎端的欄位名稱就是這個拼法
            Country::Switzerland => CountryTables {
                amount_key: "SwizCTA",
                projection_key: "SwizCTP",
                label_column: "Carbon Tax Swizterland",
            },
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Country::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnsupportedCountry {
                value: s.to_string(),
            })
    }
}

/// 表單允許的最小排放量（噸），同時也是預設值
pub const MIN_CO2_EMITTED: f64 = 905.98;
pub const MIN_FOSSIL_FUEL_SUBSIDY: f64 = 0.10;

/// 送往計算引擎的八個輸入參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestParameters {
    #[serde(rename = "a_Country")]
    pub country: Country,
    #[serde(rename = "b_CO2_Emitted")]
    pub co2_emitted: f64,
    #[serde(rename = "1_FET")]
    pub fuel_excise_tax: f64,
    #[serde(rename = "2_CT")]
    pub carbon_tax: f64,
    #[serde(rename = "3_ETS_PP")]
    pub ets_permit_price: f64,
    #[serde(rename = "4_FF_subsidy")]
    pub fossil_fuel_subsidy: f64,
    #[serde(rename = "5_Carbon_Credits")]
    pub carbon_credit_price: f64,
    /// 抵銷上限，0 到 1 之間的比例
    #[serde(rename = "5i_Offset_Cap")]
    pub offset_cap_fraction: f64,
}

impl Validate for RequestParameters {
    fn validate(&self) -> Result<()> {
        validate_input_at_least("co2_emitted", self.co2_emitted, MIN_CO2_EMITTED)?;
        validate_input_range("fuel_excise_tax", self.fuel_excise_tax, 0.0, 100.0)?;
        validate_input_range("carbon_tax", self.carbon_tax, 0.0, 10.0)?;
        validate_input_non_negative("ets_permit_price", self.ets_permit_price)?;
        validate_input_at_least(
            "fossil_fuel_subsidy",
            self.fossil_fuel_subsidy,
            MIN_FOSSIL_FUEL_SUBSIDY,
        )?;
        validate_input_range("carbon_credit_price", self.carbon_credit_price, 0.0, 50.0)?;
        validate_input_range("offset_cap", self.offset_cap_fraction, 0.0, 1.0)?;
        Ok(())
    }
}

/// 表單輸入：國家為自由字串，抵銷上限以百分比表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputForm {
    pub country: String,
    pub co2_emitted: f64,
    pub fuel_excise_tax: f64,
    pub carbon_tax: f64,
    pub ets_permit_price: f64,
    pub fossil_fuel_subsidy: f64,
    pub carbon_credit_price: f64,
    pub offset_cap_percent: f64,
}

impl Default for InputForm {
    fn default() -> Self {
        Self {
            country: Country::France.to_string(),
            co2_emitted: MIN_CO2_EMITTED,
            fuel_excise_tax: 20.0,
            carbon_tax: 2.0,
            ets_permit_price: 0.0,
            fossil_fuel_subsidy: MIN_FOSSIL_FUEL_SUBSIDY,
            carbon_credit_price: 4.57,
            offset_cap_percent: 7.0,
        }
    }
}

impl InputForm {
    pub fn to_parameters(&self) -> Result<RequestParameters> {
        let country: Country = self.country.parse()?;
        validate_input_range("offset_cap", self.offset_cap_percent, 0.0, 100.0)?;

        let params = RequestParameters {
            country,
            co2_emitted: self.co2_emitted,
            fuel_excise_tax: self.fuel_excise_tax,
            carbon_tax: self.carbon_tax,
            ets_permit_price: self.ets_permit_price,
            fossil_fuel_subsidy: self.fossil_fuel_subsidy,
            carbon_credit_price: self.carbon_credit_price,
            offset_cap_fraction: self.offset_cap_percent / 100.0,
        };
        params.validate()?;
        Ok(params)
    }
}

/// 引擎回傳的六個純量結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonTaxMetrics {
    pub effective_carbon_rate: f64,
    pub net_effective_carbon_rate: f64,
    pub total_carbon_tax: f64,
    pub max_offset_amount: f64,
    pub carbon_credit_units: f64,
    pub net_tax_after_credits: f64,
}

impl CarbonTaxMetrics {
    pub fn from_outputs(outputs: &EngineOutputs) -> Result<Self> {
        Ok(Self {
            effective_carbon_rate: scalar(outputs, "1_ECR")?,
            net_effective_carbon_rate: scalar(outputs, "2_NECR")?,
            total_carbon_tax: scalar(outputs, "3_Total_Carbon_Tax")?,
            max_offset_amount: scalar(outputs, "4_Max_Offset_Amt")?,
            carbon_credit_units: scalar(outputs, "Carbon_Credit_Units")?,
            net_tax_after_credits: scalar(outputs, "5_Carbon_Nett_Tax")?,
        })
    }

    pub fn to_metrics(&self) -> Vec<Metric> {
        vec![
            Metric::currency("Effective Carbon Rate", self.effective_carbon_rate),
            Metric::currency("Net Effective Carbon Rate", self.net_effective_carbon_rate),
            Metric::currency("Total Carbon Tax", self.total_carbon_tax),
            Metric::currency("Max Credit Offset", self.max_offset_amount),
            Metric::count("No. of Units of Carbon Credit", self.carbon_credit_units),
            Metric::currency("Net Tax after Carbon Credits", self.net_tax_after_credits),
        ]
    }
}

fn scalar(outputs: &EngineOutputs, key: &str) -> Result<f64> {
    let value = outputs
        .get(key)
        .ok_or_else(|| DashboardError::malformed(format!("missing output '{}'", key)))?;
    value.as_f64().ok_or_else(|| {
        DashboardError::malformed(format!("output '{}' is not numeric: {}", key, value))
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: f64,
    pub display: String,
}

impl Metric {
    pub fn currency(label: &str, value: f64) -> Self {
        Self {
            label: label.to_string(),
            value,
            display: format!("${:.2}", value),
        }
    }

    pub fn count(label: &str, value: f64) -> Self {
        Self {
            label: label.to_string(),
            value,
            display: format!("{}", value.round_ties_even() as i64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTab {
    pub title: String,
    pub table: Table,
    pub chart: ChartSpec,
}

/// 一次計算後要呈現的完整畫面
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub country: Country,
    pub heading: String,
    pub metrics: Vec<Metric>,
    pub tabs: Vec<ChartTab>,
    pub generated_at: DateTime<Utc>,
}

impl DashboardView {
    pub fn tab(&self, title: &str) -> Option<&ChartTab> {
        self.tabs.iter().find(|t| t.title == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_country_parsing() {
        assert_eq!("France".parse::<Country>().unwrap(), Country::France);
        assert_eq!(" switzerland ".parse::<Country>().unwrap(), Country::Switzerland);
        match "Spain".parse::<Country>() {
            Err(DashboardError::UnsupportedCountry { value }) => assert_eq!(value, "Spain"),
            other => panic!("expected UnsupportedCountry, got {:?}", other),
        }
    }

    #[test]
    fn test_switzerland_table_keys() {
        let keys = Country::Switzerland.tables();
        assert_eq!(keys.amount_key, "SwizCTA");
        assert_eq!(keys.projection_key, "SwizCTP");
        assert_eq!(keys.label_column, "Carbon Tax Swizterland");
    }

    #[test]
    fn test_request_parameters_wire_names() {
        let params = InputForm::default().to_parameters().unwrap();
        let value = serde_json::to_value(&params).unwrap();

        assert_eq!(value["a_Country"], json!("France"));
        assert_eq!(value["b_CO2_Emitted"], json!(905.98));
        assert_eq!(value["1_FET"], json!(20.0));
        assert_eq!(value["2_CT"], json!(2.0));
        assert_eq!(value["3_ETS_PP"], json!(0.0));
        assert_eq!(value["4_FF_subsidy"], json!(0.10));
        assert_eq!(value["5_Carbon_Credits"], json!(4.57));
        assert_eq!(value["5i_Offset_Cap"], json!(0.07));
        assert_eq!(value.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_form_rejects_out_of_range_offset_cap() {
        let form = InputForm {
            offset_cap_percent: 150.0,
            ..InputForm::default()
        };
        assert!(matches!(
            form.to_parameters(),
            Err(DashboardError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_form_rejects_negative_co2_emitted() {
        let form = InputForm {
            co2_emitted: -500.0,
            ..InputForm::default()
        };
        match form.to_parameters() {
            Err(DashboardError::InvalidInput { field, .. }) => assert_eq!(field, "co2_emitted"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_form_enforces_form_minimums() {
        let below_co2 = InputForm {
            co2_emitted: 900.0,
            ..InputForm::default()
        };
        let below_subsidy = InputForm {
            fossil_fuel_subsidy: 0.05,
            ..InputForm::default()
        };
        let at_minimums = InputForm {
            co2_emitted: MIN_CO2_EMITTED,
            fossil_fuel_subsidy: MIN_FOSSIL_FUEL_SUBSIDY,
            ..InputForm::default()
        };

        assert!(matches!(
            below_co2.to_parameters(),
            Err(DashboardError::InvalidInput { .. })
        ));
        assert!(matches!(
            below_subsidy.to_parameters(),
            Err(DashboardError::InvalidInput { .. })
        ));
        assert!(at_minimums.to_parameters().is_ok());
    }

    #[test]
    fn test_unit_count_rounds_half_to_even() {
        assert_eq!(Metric::count("units", 306.5).display, "306");
        assert_eq!(Metric::count("units", 307.5).display, "308");
        assert_eq!(Metric::count("units", 306.7).display, "307");
    }

    #[test]
    fn test_form_rejects_unsupported_country_before_ranges() {
        let form = InputForm {
            country: "Narnia".to_string(),
            carbon_tax: 99.0,
            ..InputForm::default()
        };
        assert!(matches!(
            form.to_parameters(),
            Err(DashboardError::UnsupportedCountry { .. })
        ));
    }

    #[test]
    fn test_metrics_formatting() {
        let outputs = json!({
            "1_ECR": 22.104,
            "2_NECR": 20.5,
            "3_Total_Carbon_Tax": 20026.2,
            "4_Max_Offset_Amt": 1401.834,
            "Carbon_Credit_Units": 306.7,
            "5_Carbon_Nett_Tax": 18624.366
        });
        let metrics = CarbonTaxMetrics::from_outputs(outputs.as_object().unwrap())
            .unwrap()
            .to_metrics();

        let displays: Vec<&str> = metrics.iter().map(|m| m.display.as_str()).collect();
        assert_eq!(
            displays,
            vec!["$22.10", "$20.50", "$20026.20", "$1401.83", "307", "$18624.37"]
        );
    }

    #[test]
    fn test_missing_scalar_is_malformed() {
        let outputs = json!({ "1_ECR": 1.0 });
        assert!(matches!(
            CarbonTaxMetrics::from_outputs(outputs.as_object().unwrap()),
            Err(DashboardError::EngineResponseMalformed { .. })
        ));
    }
}
