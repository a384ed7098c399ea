use crate::utils::error::{DashboardError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// 以列標籤索引的二維表，欄位順序即為插入順序
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    index: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Vec<Value>>,
}

impl Table {
    pub fn from_parts(index: Vec<String>, columns: Vec<String>, cells: Vec<Vec<Value>>) -> Result<Self> {
        if cells.len() != index.len() {
            return Err(DashboardError::malformed(format!(
                "table has {} index labels but {} rows",
                index.len(),
                cells.len()
            )));
        }
        if let Some(bad) = cells.iter().position(|row| row.len() != columns.len()) {
            return Err(DashboardError::malformed(format!(
                "row '{}' has {} cells, expected {}",
                index[bad],
                cells[bad].len(),
                columns.len()
            )));
        }
        Ok(Self {
            index,
            columns,
            cells,
        })
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.index
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    pub fn cell(&self, row: &str, column: &str) -> Option<&Value> {
        let r = self.index.iter().position(|i| i == row)?;
        let c = self.columns.iter().position(|col| col == column)?;
        Some(&self.cells[r][c])
    }

    /// 依欄位名稱取出整欄（名稱重複時取第一個）
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let c = self.columns.iter().position(|col| col == name)?;
        Some(self.cells.iter().map(|row| &row[c]).collect())
    }

    pub fn row(&self, label: &str) -> Option<&[Value]> {
        let r = self.index.iter().position(|i| i == label)?;
        Some(&self.cells[r])
    }

    pub fn transpose(&self) -> Table {
        let cells = (0..self.columns.len())
            .map(|c| self.cells.iter().map(|row| row[c].clone()).collect())
            .collect();
        Table {
            index: self.columns.clone(),
            columns: self.index.clone(),
            cells,
        }
    }

    /// 轉回列導向的 JSON 物件，索引值放在 `index_label` 欄位
    pub fn to_rows(&self, index_label: &str) -> Vec<Value> {
        self.rows()
            .map(|(label, values)| {
                let mut obj = Map::new();
                obj.insert(index_label.to_string(), Value::String(label.to_string()));
                for (column, value) in self.columns.iter().zip(values) {
                    obj.insert(column.clone(), value.clone());
                }
                Value::Object(obj)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        Table::from_parts(
            vec!["Scope 1".to_string(), "Scope 2".to_string()],
            vec!["2022".to_string(), "2023".to_string()],
            vec![vec![json!(1), json!(2)], vec![json!(3), json!(4)]],
        )
        .unwrap()
    }

    #[test]
    fn test_from_parts_rejects_ragged_rows() {
        let result = Table::from_parts(
            vec!["a".to_string()],
            vec!["x".to_string(), "y".to_string()],
            vec![vec![json!(1)]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_lookup_and_transpose() {
        let table = sample();
        assert_eq!(table.cell("Scope 2", "2022"), Some(&json!(3)));
        assert_eq!(table.column("2023").unwrap(), vec![&json!(2), &json!(4)]);

        let t = table.transpose();
        assert_eq!(t.index(), &["2022".to_string(), "2023".to_string()]);
        assert_eq!(t.cell("2023", "Scope 1"), Some(&json!(2)));
        assert_eq!(t.transpose(), table);
    }

    #[test]
    fn test_to_rows_keeps_column_order() {
        let rows = sample().to_rows("Scope");
        let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Scope", "2022", "2023"]);
        assert_eq!(rows[1]["2023"], json!(4));
    }
}
