//! Cell-level cleaning applied after column renaming.

/// Escape that Excel writes for a carriage return inside shared strings.
const EXCEL_CR_ESCAPE: &str = "_x000D_";

fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// Trims surrounding whitespace and normalizes every line-break flavour to `\n`.
///
/// Line breaks at the edges are kept (they become `\n`), any other edge
/// whitespace is removed. A value that is nothing but whitespace comes back
/// empty, which makes the function idempotent.
pub fn clean_value(raw: &str) -> String {
    let trimmed = raw.trim_matches(|ch: char| ch.is_whitespace() && !is_line_break(ch));

    let normalized = trimmed
        .replace(EXCEL_CR_ESCAPE, "\n")
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    if normalized.trim().is_empty() {
        String::new()
    } else {
        normalized
    }
}

/// Missing cells become the empty string.
pub fn clean_cell(cell: Option<&str>) -> String {
    cell.map(clean_value).unwrap_or_default()
}

/// True when the raw row carries no value at all.
pub fn is_missing_row(row: &[Option<String>]) -> bool {
    row.iter().all(Option::is_none)
}
