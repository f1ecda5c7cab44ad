//! Picking a source file when none was given on the command line.

use crate::utils::error::Result;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub const CANDIDATE_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];

fn is_candidate(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            CANDIDATE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

/// Names of spreadsheet and CSV files directly inside `dir`, sorted.
pub fn list_candidates(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_candidate(&path) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// A 1-based number within range picks a candidate; anything else is a path.
pub fn resolve_choice(choice: &str, candidates: &[String]) -> PathBuf {
    let choice = choice.trim();
    match choice.parse::<usize>() {
        Ok(n) if (1..=candidates.len()).contains(&n) => PathBuf::from(&candidates[n - 1]),
        _ => PathBuf::from(choice),
    }
}

/// Lists candidates in `dir` on `output` and reads the user's pick from `input`.
///
/// Returned paths are relative to `dir`.
pub fn prompt_for_source<R: BufRead, W: Write>(
    dir: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf> {
    let candidates = list_candidates(dir)?;

    if candidates.is_empty() {
        write!(output, "Enter the path to the spreadsheet: ")?;
    } else {
        writeln!(output, "Found spreadsheet/CSV files:")?;
        for (index, name) in candidates.iter().enumerate() {
            writeln!(output, "{}. {}", index + 1, name)?;
        }
        write!(output, "\nEnter a file number or a path: ")?;
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(resolve_choice(&line, &candidates))
}
