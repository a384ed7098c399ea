use serde::Serialize;

/// 可直接交給 plotly 的圖表描述（`data` + `layout`）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub data: Vec<BarTrace>,
    pub layout: ChartLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    pub text: Vec<String>,
    pub textposition: String,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub title: ChartTitle,
    pub barmode: BarMode,
    pub width: u32,
    pub height: u32,
    pub bargroupgap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTitle {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Group,
    Stack,
}

/// 單一群組中的一根長條
#[derive(Debug, Clone, PartialEq)]
pub struct Bar<'a> {
    pub series: &'a str,
    pub value: Option<f64>,
    pub text: &'a str,
}

impl ChartSpec {
    /// x 軸上的群組標籤
    pub fn groups(&self) -> &[String] {
        self.data.first().map(|t| t.x.as_slice()).unwrap_or(&[])
    }

    pub fn bars_in_group(&self, group: &str) -> Vec<Bar<'_>> {
        self.data
            .iter()
            .filter_map(|trace| {
                let i = trace.x.iter().position(|x| x == group)?;
                Some(Bar {
                    series: &trace.name,
                    value: trace.y[i],
                    text: &trace.text[i],
                })
            })
            .collect()
    }

    pub fn bar_count(&self) -> usize {
        self.data.iter().map(|t| t.x.len()).sum()
    }
}
