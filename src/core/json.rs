//! JSON layouts for a [`TabularDataset`].
//!
//! Row labels are zero-based positions. Object keys keep column and row
//! order, so the same dataset always encodes to the same bytes.

use crate::domain::model::{CellValue, TabularDataset};
use crate::utils::error::Result;
use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum JsonOrient {
    /// `{"COL": {"0": v, ...}, ...}`
    #[default]
    Columns,
    /// `[{"COL": v, ...}, ...]`
    Records,
    /// `{"0": {"COL": v, ...}, ...}`
    Index,
    /// `{"columns": [...], "index": [...], "data": [[...], ...]}`
    Split,
    /// `[[...], ...]`
    Values,
}

impl fmt::Display for JsonOrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonOrient::Columns => "columns",
            JsonOrient::Records => "records",
            JsonOrient::Index => "index",
            JsonOrient::Split => "split",
            JsonOrient::Values => "values",
        };
        f.write_str(name)
    }
}

pub fn encode(dataset: &TabularDataset, orient: JsonOrient) -> Result<Vec<u8>> {
    let bytes = match orient {
        JsonOrient::Columns => serde_json::to_vec(&ByColumn(dataset))?,
        JsonOrient::Records => serde_json::to_vec(&Records(dataset))?,
        JsonOrient::Index => serde_json::to_vec(&ByIndex(dataset))?,
        JsonOrient::Split => serde_json::to_vec(&Split(dataset))?,
        JsonOrient::Values => serde_json::to_vec(dataset.rows())?,
    };
    Ok(bytes)
}

struct ByColumn<'a>(&'a TabularDataset);
struct ColumnCells<'a>(&'a TabularDataset, usize);
struct Records<'a>(&'a TabularDataset);
struct ByIndex<'a>(&'a TabularDataset);
struct RowObject<'a>(&'a TabularDataset, &'a [CellValue]);
struct Split<'a>(&'a TabularDataset);
struct ColumnNames<'a>(&'a TabularDataset);

impl Serialize for ByColumn<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let columns = self.0.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for (index, column) in columns.iter().enumerate() {
            map.serialize_entry(&column.name, &ColumnCells(self.0, index))?;
        }
        map.end()
    }
}

impl Serialize for ColumnCells<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let rows = self.0.rows();
        let mut map = serializer.serialize_map(Some(rows.len()))?;
        for (label, row) in rows.iter().enumerate() {
            map.serialize_entry(&label.to_string(), &row[self.1])?;
        }
        map.end()
    }
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.1.len()))?;
        for (column, cell) in self.0.columns().iter().zip(self.1) {
            map.serialize_entry(&column.name, cell)?;
        }
        map.end()
    }
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let rows = self.0.rows();
        let mut seq = serializer.serialize_seq(Some(rows.len()))?;
        for row in rows {
            seq.serialize_element(&RowObject(self.0, row))?;
        }
        seq.end()
    }
}

impl Serialize for ByIndex<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let rows = self.0.rows();
        let mut map = serializer.serialize_map(Some(rows.len()))?;
        for (label, row) in rows.iter().enumerate() {
            map.serialize_entry(&label.to_string(), &RowObject(self.0, row))?;
        }
        map.end()
    }
}

impl Serialize for ColumnNames<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.column_names())
    }
}

impl Serialize for Split<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let index: Vec<usize> = (0..self.0.len()).collect();
        let mut state = serializer.serialize_struct("Split", 3)?;
        state.serialize_field("columns", &ColumnNames(self.0))?;
        state.serialize_field("index", &index)?;
        state.serialize_field("data", self.0.rows())?;
        state.end()
    }
}
