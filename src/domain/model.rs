use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Which loader strategy produced a [`RawTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Xlsx,
    Xls,
    SemicolonCsv,
    CommaCsv,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceFormat::Xlsx => "xlsx workbook",
            SourceFormat::Xls => "xls workbook",
            SourceFormat::SemicolonCsv => "semicolon-delimited text",
            SourceFormat::CommaCsv => "comma-delimited text",
        };
        f.write_str(name)
    }
}

/// A source table as loaded, before renaming or cleaning.
///
/// `None` marks a missing cell. Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    pub format: SourceFormat,
}

/// One output ticket: column name to cleaned cell value, in source column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    pub fn is_blank(&self) -> bool {
        self.data
            .values()
            .all(|value| value.as_str().is_some_and(str::is_empty))
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<Record>,
    pub columns: Vec<String>,
    pub format: SourceFormat,
    pub dropped_blank_rows: usize,
    pub dropped_after_cleaning: usize,
}

/// What a finished (or previewed) conversion reports back to the caller.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub record_count: usize,
    pub output_path: PathBuf,
    pub columns: Vec<String>,
    pub format: SourceFormat,
    pub dropped_blank_rows: usize,
    pub dropped_after_cleaning: usize,
    pub written: bool,
}
