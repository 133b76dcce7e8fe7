use crate::utils::error::{Result, SnapshotError};
use serde::{Deserialize, Serialize, Serializer};
use std::path::PathBuf;

/// One scrape target: where the table lives and where its JSON goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEndpoint {
    pub name: String,
    pub url: String,
    /// Relative to the configured base directory.
    pub output: PathBuf,
}

impl SourceEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            output: output.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Integer(v) => serializer.serialize_i64(*v),
            CellValue::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            CellValue::Float(_) => serializer.serialize_none(),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Rows of uniformly typed columns parsed from one HTML table.
///
/// Every row carries exactly one cell per column, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularDataset {
    columns: Vec<Column>,
    rows: Vec<Vec<CellValue>>,
}

impl TabularDataset {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(SnapshotError::ParseError {
                message: format!(
                    "row {} has {} cells but the header has {} columns",
                    index,
                    row.len(),
                    columns.len()
                ),
            });
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_column(name: &str) -> Column {
        Column {
            name: name.to_string(),
            kind: ColumnKind::Text,
        }
    }

    #[test]
    fn test_dataset_rejects_ragged_rows() {
        let result = TabularDataset::new(
            vec![text_column("A"), text_column("B")],
            vec![vec![CellValue::Text("x".to_string())]],
        );
        assert!(matches!(result, Err(SnapshotError::ParseError { .. })));
    }

    #[test]
    fn test_cell_lookup_by_column_name() {
        let dataset = TabularDataset::new(
            vec![text_column("Team"), text_column("City")],
            vec![vec![
                CellValue::Text("Alpha".to_string()),
                CellValue::Null,
            ]],
        )
        .unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.cell(0, "Team").and_then(|c| c.as_str()), Some("Alpha"));
        assert!(dataset.cell(0, "City").unwrap().is_null());
        assert!(dataset.cell(0, "Missing").is_none());
        assert!(dataset.cell(1, "Team").is_none());
    }

    #[test]
    fn test_non_finite_float_serializes_as_null() {
        let json = serde_json::to_string(&vec![
            CellValue::Float(f64::NAN),
            CellValue::Float(1.5),
            CellValue::Integer(3),
        ])
        .unwrap();
        assert_eq!(json, "[null,1.5,3]");
    }
}
