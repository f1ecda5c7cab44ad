//! Source loading: a fixed chain of format strategies, first success wins.

use crate::core::columns::dedupe_headers;
use crate::domain::model::{RawTable, SourceFormat};
use crate::utils::error::{ConvertError, Result};
use calamine::{Data, Reader, Xls, Xlsx};
use chrono::NaiveDateTime;
use std::io::Cursor;
use std::path::Path;

/// Tried top to bottom.
pub const LOAD_ORDER: [SourceFormat; 4] = [
    SourceFormat::Xlsx,
    SourceFormat::Xls,
    SourceFormat::SemicolonCsv,
    SourceFormat::CommaCsv,
];

/// Raw strings read as absent cells, on top of the empty string.
pub const DEFAULT_MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn default_missing_markers() -> Vec<String> {
    DEFAULT_MISSING_MARKERS.iter().map(|s| s.to_string()).collect()
}

/// Runs every strategy in [`LOAD_ORDER`] against `bytes`.
///
/// Intermediate failures are logged and dropped; if nothing parses, the last
/// failure is carried in [`ConvertError::UnreadableSource`].
pub fn load_table(path: &Path, bytes: &[u8], missing_markers: &[String]) -> Result<RawTable> {
    let mut last_error = None;

    for format in LOAD_ORDER {
        match load_as(format, bytes, missing_markers) {
            Ok(table) => {
                tracing::info!(
                    "Loaded {} as {} ({} columns, {} rows)",
                    path.display(),
                    format,
                    table.headers.len(),
                    table.rows.len()
                );
                return Ok(table);
            }
            Err(e) => {
                tracing::debug!("Reading {} as {} failed: {}", path.display(), format, e);
                last_error = Some(e);
            }
        }
    }

    Err(ConvertError::UnreadableSource {
        path: path.to_path_buf(),
        last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
    })
}

pub fn load_as(format: SourceFormat, bytes: &[u8], missing_markers: &[String]) -> Result<RawTable> {
    match format {
        SourceFormat::Xlsx => {
            let mut workbook: Xlsx<_> =
                Xlsx::new(Cursor::new(bytes)).map_err(calamine::Error::from)?;
            let range = workbook
                .worksheet_range_at(0)
                .ok_or_else(no_worksheets)?
                .map_err(calamine::Error::from)?;
            Ok(table_from_range(&range, format, missing_markers))
        }
        SourceFormat::Xls => {
            let mut workbook: Xls<_> = Xls::new(Cursor::new(bytes)).map_err(calamine::Error::from)?;
            let range = workbook
                .worksheet_range_at(0)
                .ok_or_else(no_worksheets)?
                .map_err(calamine::Error::from)?;
            Ok(table_from_range(&range, format, missing_markers))
        }
        SourceFormat::SemicolonCsv => load_delimited(bytes, b';', format, missing_markers),
        SourceFormat::CommaCsv => load_delimited(bytes, b',', format, missing_markers),
    }
}

fn no_worksheets() -> ConvertError {
    ConvertError::Processing {
        message: "workbook has no worksheets".to_string(),
    }
}

/// First row is the header; an empty sheet yields an empty table.
fn table_from_range(
    range: &calamine::Range<Data>,
    format: SourceFormat,
    missing_markers: &[String],
) -> RawTable {
    let mut rows = range.rows();

    let headers = match rows.next() {
        Some(header_row) => dedupe_headers(
            header_row
                .iter()
                .map(|cell| render_cell(cell, &[]).unwrap_or_default())
                .collect(),
        ),
        None => Vec::new(),
    };

    let rows = rows
        .map(|row| {
            let mut cells: Vec<Option<String>> = row
                .iter()
                .map(|cell| render_cell(cell, missing_markers))
                .collect();
            cells.resize(headers.len(), None);
            cells
        })
        .collect();

    RawTable {
        headers,
        rows,
        format,
    }
}

/// String form of a workbook cell, `None` when the cell counts as missing.
pub fn render_cell(cell: &Data, missing_markers: &[String]) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => render_float(*f),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => render_datetime(datetime),
            None => render_float(dt.as_f64()),
        },
        Data::Error(e) => e.to_string(),
    };
    present(text, missing_markers)
}

fn render_datetime(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn render_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn present(text: String, missing_markers: &[String]) -> Option<String> {
    if text.is_empty() || missing_markers.iter().any(|marker| *marker == text) {
        None
    } else {
        Some(text)
    }
}

fn load_delimited(
    bytes: &[u8],
    delimiter: u8,
    format: SourceFormat,
    missing_markers: &[String],
) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let raw_headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(index, header)| {
            if index == 0 {
                header.trim_start_matches('\u{feff}').to_string()
            } else {
                header.to_string()
            }
        })
        .collect();

    if raw_headers.is_empty() || (raw_headers.len() == 1 && raw_headers[0].is_empty()) {
        return Err(ConvertError::Processing {
            message: "no columns to parse from file".to_string(),
        });
    }

    if delimiter != b',' && raw_headers.len() == 1 && raw_headers[0].contains(',') {
        return Err(ConvertError::Processing {
            message: format!(
                "single column '{}' looks comma-delimited",
                raw_headers[0]
            ),
        });
    }

    let header_has_comma = raw_headers.iter().any(|header| header.contains(','));
    let headers = dedupe_headers(raw_headers);
    let mut rows = Vec::new();
    let mut comma_only_rows = 0;

    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if record.is_empty() || (record.len() == 1 && record[0].is_empty()) {
            continue;
        }
        if record.len() > headers.len() {
            return Err(ConvertError::Processing {
                message: format!(
                    "expected {} fields in data row {}, saw {}",
                    headers.len(),
                    line + 1,
                    record.len()
                ),
            });
        }

        if record.len() == 1 && record[0].contains(',') {
            comma_only_rows += 1;
        }

        let mut cells: Vec<Option<String>> = record
            .iter()
            .map(|field| present(field.to_string(), missing_markers))
            .collect();
        cells.resize(headers.len(), None);
        rows.push(cells);
    }

    // every row collapsed into one comma-joined field: the ';' in the header was text
    if delimiter != b','
        && header_has_comma
        && !rows.is_empty()
        && comma_only_rows == rows.len()
    {
        return Err(ConvertError::Processing {
            message: "rows hold a single comma-separated field each; looks comma-delimited"
                .to_string(),
        });
    }

    Ok(RawTable {
        headers,
        rows,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    fn load(contents: &[u8]) -> Result<RawTable> {
        load_table(Path::new("test.csv"), contents, &default_missing_markers())
    }

    fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_semicolon_csv_is_preferred() {
        let table = load("Номер;Вопрос;Ответ\n1;Что?;Ничего\n".as_bytes()).unwrap();
        assert_eq!(table.format, SourceFormat::SemicolonCsv);
        assert_eq!(table.headers, vec!["Номер", "Вопрос", "Ответ"]);
        assert_eq!(table.rows, vec![cells(&[Some("1"), Some("Что?"), Some("Ничего")])]);
    }

    #[test]
    fn test_comma_csv_falls_through_to_comma_strategy() {
        let table = load(b"Number,Question,Answer\n1,\"Why, exactly?\",Because\n").unwrap();
        assert_eq!(table.format, SourceFormat::CommaCsv);
        assert_eq!(table.headers.len(), 3);
        assert_eq!(table.rows[0][1].as_deref(), Some("Why, exactly?"));
    }

    #[test]
    fn test_semicolon_inside_comma_header_still_reads_as_comma() {
        let table = load("Номер,Вопрос (ч.1; ч.2),Ответ\n1,Что?,Ничего\n2,Где?,Там\n".as_bytes())
            .unwrap();
        assert_eq!(table.format, SourceFormat::CommaCsv);
        assert_eq!(table.headers, vec!["Номер", "Вопрос (ч.1; ч.2)", "Ответ"]);
        assert_eq!(table.rows[1], cells(&[Some("2"), Some("Где?"), Some("Там")]));
    }

    #[test]
    fn test_semicolon_rows_with_commas_in_text_stay_semicolon() {
        let table = load("Номер;Вопрос, часть 1\n1;Что, где?\n".as_bytes()).unwrap();
        assert_eq!(table.format, SourceFormat::SemicolonCsv);
        assert_eq!(table.rows[0], cells(&[Some("1"), Some("Что, где?")]));
    }

    #[test]
    fn test_xls_strategy_rejects_non_compound_file_bytes() {
        let err = load_as(
            SourceFormat::Xls,
            b"a;b\n1;2\n",
            &default_missing_markers(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::Workbook(_)));

        let err = load_as(SourceFormat::Xls, b"", &default_missing_markers()).unwrap_err();
        assert!(matches!(err, ConvertError::Workbook(_)));
    }

    #[test]
    fn test_chain_moves_past_both_workbook_strategies() {
        let bytes = b"a;b\n1;2\n";
        assert!(load_as(SourceFormat::Xlsx, bytes, &[]).is_err());
        assert!(load_as(SourceFormat::Xls, bytes, &[]).is_err());
        assert_eq!(load(bytes).unwrap().format, SourceFormat::SemicolonCsv);
    }

    #[test]
    fn test_single_column_semicolon_source_without_commas() {
        let table = load(b"Question\nWhat?\n").unwrap();
        assert_eq!(table.format, SourceFormat::SemicolonCsv);
        assert_eq!(table.headers, vec!["Question"]);
    }

    #[test]
    fn test_comma_header_rejects_semicolon_reading() {
        // header has a comma and no ';', so the semicolon reading is rejected
        let table = load(b"a,b\n1;2,3\n").unwrap();
        assert_eq!(table.format, SourceFormat::CommaCsv);
        assert_eq!(table.rows, vec![cells(&[Some("1;2"), Some("3")])]);
    }

    #[test]
    fn test_short_rows_are_padded_and_blank_lines_skipped() {
        let table = load(b"a;b;c\n1\n\n;;\n").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], cells(&[Some("1"), None, None]));
        assert_eq!(table.rows[1], cells(&[None, None, None]));
    }

    #[test]
    fn test_missing_markers_and_whitespace() {
        let table = load(b"a;b;c;d\nNA;  ;null;n/a value\n").unwrap();
        assert_eq!(table.rows[0], cells(&[None, Some("  "), None, Some("n/a value")]));

        let table = load_table(Path::new("t.csv"), b"a;b\nNA;x\n", &[]).unwrap();
        assert_eq!(table.rows[0], cells(&[Some("NA"), Some("x")]));
    }

    #[test]
    fn test_headers_are_deduplicated_and_bom_stripped() {
        let table = load("\u{feff}Вопрос;;Вопрос\nx;y;z\n".as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Вопрос", "Unnamed: 1", "Вопрос.1"]);
    }

    #[test]
    fn test_unreadable_sources_report_last_error() {
        let err = load(b"").unwrap_err();
        assert!(matches!(err, ConvertError::UnreadableSource { .. }));

        let err = load(&[b'a', b';', b'b', b'\n', 0xff, 0xfe, b';', b'x', b'\n']).unwrap_err();
        match err {
            ConvertError::UnreadableSource { path, last_error } => {
                assert_eq!(path, Path::new("test.csv"));
                assert!(!last_error.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_render_datetime() {
        let datetime = chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .unwrap();
        assert_eq!(render_datetime(datetime), "2024-06-01 09:30:00");
    }

    #[test]
    fn test_render_cell() {
        let markers = default_missing_markers();
        assert_eq!(render_cell(&Data::Empty, &markers), None);
        assert_eq!(render_cell(&Data::Float(1.0), &markers).as_deref(), Some("1"));
        assert_eq!(render_cell(&Data::Float(2.5), &markers).as_deref(), Some("2.5"));
        assert_eq!(render_cell(&Data::Int(42), &markers).as_deref(), Some("42"));
        assert_eq!(render_cell(&Data::Bool(true), &markers).as_deref(), Some("True"));
        assert_eq!(
            render_cell(&Data::String("Что?".to_string()), &markers).as_deref(),
            Some("Что?")
        );
        assert_eq!(render_cell(&Data::String("NULL".to_string()), &markers), None);
        assert_eq!(render_cell(&Data::Error(CellErrorType::NA), &markers), None);
        assert_eq!(
            render_cell(&Data::Error(CellErrorType::Div0), &markers).as_deref(),
            Some("#DIV/0!")
        );
    }
}
