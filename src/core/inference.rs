//! Per-column type classification.
//!
//! A column is numeric when every non-empty cell parses as a number; integer
//! when all of those numbers are whole, float otherwise. Anything else, and
//! any column with no non-empty cells, is text. Empty cells become null.

use crate::core::html_table::RawTable;
use crate::domain::model::{CellValue, Column, ColumnKind, TabularDataset};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Integer(i64),
    Float(f64),
}

fn parse_number(cell: &str) -> Option<Number> {
    let trimmed = cell.trim();
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let cleaned: String = trimmed.chars().filter(|&c| c != ',').collect();
    if let Ok(v) = cleaned.parse::<i64>() {
        return Some(Number::Integer(v));
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Number::Float)
}

pub fn classify_column<'a>(cells: impl IntoIterator<Item = &'a str>) -> ColumnKind {
    let mut seen_value = false;
    let mut all_integer = true;

    for cell in cells {
        if cell.trim().is_empty() {
            continue;
        }
        seen_value = true;

        match parse_number(cell) {
            Some(Number::Integer(_)) => {}
            Some(Number::Float(_)) => all_integer = false,
            None => return ColumnKind::Text,
        }
    }

    match (seen_value, all_integer) {
        (false, _) => ColumnKind::Text,
        (true, true) => ColumnKind::Integer,
        (true, false) => ColumnKind::Float,
    }
}

pub fn convert_cell(cell: &str, kind: ColumnKind) -> CellValue {
    if cell.trim().is_empty() {
        return CellValue::Null;
    }

    match (kind, parse_number(cell)) {
        (ColumnKind::Integer, Some(Number::Integer(v))) => CellValue::Integer(v),
        (ColumnKind::Float, Some(Number::Integer(v))) => CellValue::Float(v as f64),
        (ColumnKind::Float, Some(Number::Float(v))) => CellValue::Float(v),
        _ => CellValue::Text(cell.to_string()),
    }
}

pub fn infer_dataset(raw: RawTable) -> Result<TabularDataset> {
    let columns: Vec<Column> = raw
        .header
        .iter()
        .enumerate()
        .map(|(index, name)| Column {
            name: name.clone(),
            kind: classify_column(raw.column(index)),
        })
        .collect();

    for column in &columns {
        tracing::debug!("Column '{}' classified as {:?}", column.name, column.kind);
    }
    tracing::debug!(
        "{} of {} columns numeric",
        columns.iter().filter(|c| c.kind.is_numeric()).count(),
        columns.len()
    );

    let rows = raw
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&columns)
                .map(|(cell, column)| convert_cell(cell, column.kind))
                .collect()
        })
        .collect();

    TabularDataset::new(columns, rows)
}
