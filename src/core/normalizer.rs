//! Rename → drop missing rows → clean → drop blank records.

use crate::core::cleaning::{clean_cell, is_missing_row};
use crate::core::columns::{ColumnMapper, ColumnRule};
use crate::domain::model::{RawTable, Record, TransformResult};
use serde_json::{Map, Value};

pub fn normalize(table: RawTable, rules: &[ColumnRule]) -> TransformResult {
    let columns = ColumnMapper::new(rules).rename(&table.headers);

    let total_rows = table.rows.len();
    let present_rows: Vec<Vec<Option<String>>> = table
        .rows
        .into_iter()
        .filter(|row| !is_missing_row(row))
        .collect();
    let dropped_blank_rows = total_rows - present_rows.len();

    let mut records = Vec::with_capacity(present_rows.len());
    for row in &present_rows {
        let data: Map<String, Value> = columns
            .iter()
            .zip(row)
            .map(|(column, cell)| (column.clone(), Value::String(clean_cell(cell.as_deref()))))
            .collect();
        let record = Record { data };
        if !record.is_blank() {
            records.push(record);
        }
    }
    let dropped_after_cleaning = present_rows.len() - records.len();

    tracing::debug!(
        "Dropped {} missing rows before cleaning and {} blank records after",
        dropped_blank_rows,
        dropped_after_cleaning
    );

    TransformResult {
        records,
        columns,
        format: table.format,
        dropped_blank_rows,
        dropped_after_cleaning,
    }
}
