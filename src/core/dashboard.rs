use crate::core::chart::render_grouped_bars;
use crate::core::reshape::reshape_output;
use crate::core::EngineClient;
use crate::domain::model::{
    CarbonTaxMetrics, ChartTab, Country, DashboardView, EngineOutputs, InputForm,
};
use crate::domain::table::Table;
use crate::utils::error::{DashboardError, Result};
use chrono::Utc;
use std::time::Instant;

pub const AMOUNT_TAB: &str = "Carbon Tax Amount";
pub const PROJECTION_TAB: &str = "Carbon Tax Projections";

/// 某國的金額表 (CTA) 與預測表 (CTP)，已轉置
#[derive(Debug, Clone, PartialEq)]
pub struct CountryTablePair {
    pub amount: Table,
    pub projection: Table,
}

/// 引擎輸出的八張表，依國家整理
#[derive(Debug, Clone)]
pub struct ReshapedOutputs {
    tables: Vec<(Country, CountryTablePair)>,
}

impl ReshapedOutputs {
    pub fn from_outputs(outputs: &EngineOutputs) -> Result<Self> {
        let tables = Country::ALL
            .into_iter()
            .map(|country| {
                let keys = country.tables();
                let pair = CountryTablePair {
                    amount: reshape_output(outputs, keys.amount_key, keys.label_column)?,
                    projection: reshape_output(outputs, keys.projection_key, keys.label_column)?,
                };
                Ok((country, pair))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tables })
    }

    pub fn into_country(self, country: Country) -> Result<CountryTablePair> {
        self.tables
            .into_iter()
            .find(|(c, _)| *c == country)
            .map(|(_, pair)| pair)
            .ok_or_else(|| DashboardError::malformed(format!("no tables for {}", country)))
    }
}

/// 儀表板：收集輸入 → 呼叫引擎 → 轉置 → 繪圖
pub struct Dashboard<E: EngineClient> {
    engine: E,
}

impl<E: EngineClient> Dashboard<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub async fn render(&self, form: &InputForm) -> Result<DashboardView> {
        let params = form.to_parameters()?;
        tracing::info!("🧮 Solving carbon credits for {}", params.country);

        let started = Instant::now();
        let outputs = self.engine.invoke(&params).await?;
        tracing::debug!("Engine round trip took {:?}", started.elapsed());

        build_view(params.country, &outputs)
    }
}

/// 由引擎輸出組出畫面，不做任何 I/O
pub fn build_view(country: Country, outputs: &EngineOutputs) -> Result<DashboardView> {
    let metrics = CarbonTaxMetrics::from_outputs(outputs)?.to_metrics();
    let pair = ReshapedOutputs::from_outputs(outputs)?.into_country(country)?;

    let tabs = vec![
        ChartTab {
            title: AMOUNT_TAB.to_string(),
            chart: render_grouped_bars(AMOUNT_TAB, &pair.amount)?,
            table: pair.amount,
        },
        ChartTab {
            title: PROJECTION_TAB.to_string(),
            chart: render_grouped_bars(PROJECTION_TAB, &pair.projection)?,
            table: pair.projection,
        },
    ];

    Ok(DashboardView {
        country,
        heading: format!("{} Carbon Tax Calculations", country),
        metrics,
        tabs,
        generated_at: Utc::now(),
    })
}
