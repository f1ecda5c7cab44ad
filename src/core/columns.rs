//! Column role inference: ordered keyword rules, first match wins.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Renames any header containing `keyword` (case-insensitive) to `canonical`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRule {
    pub keyword: String,
    pub canonical: String,
}

impl ColumnRule {
    pub fn new(keyword: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            canonical: canonical.into(),
        }
    }
}

/// Canonical label sets for the three ticket roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LabelPreset {
    /// Номер билета / Вопрос / Ответ
    #[default]
    Ru,
    /// Ticket Number / Question / Answer
    En,
}

impl LabelPreset {
    pub fn labels(self) -> [&'static str; 3] {
        match self {
            LabelPreset::Ru => ["Номер билета", "Вопрос", "Ответ"],
            LabelPreset::En => ["Ticket Number", "Question", "Answer"],
        }
    }

    /// Ticket-number keywords come first, then question, then answer.
    /// Russian and English keywords are matched under either label set.
    pub fn rules(self) -> Vec<ColumnRule> {
        let [ticket, question, answer] = self.labels();
        vec![
            ColumnRule::new("номер", ticket),
            ColumnRule::new("билет", ticket),
            ColumnRule::new("number", ticket),
            ColumnRule::new("ticket", ticket),
            ColumnRule::new("вопрос", question),
            ColumnRule::new("question", question),
            ColumnRule::new("ответ", answer),
            ColumnRule::new("answer", answer),
        ]
    }
}

/// Rules with keywords pre-normalized for matching.
#[derive(Debug, Clone)]
pub struct ColumnMapper {
    rules: Vec<(String, String)>,
}

impl ColumnMapper {
    pub fn new(rules: &[ColumnRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| (rule.keyword.trim().to_lowercase(), rule.canonical.clone()))
            .filter(|(keyword, _)| !keyword.is_empty())
            .collect();
        Self { rules }
    }

    pub fn canonical_for(&self, header: &str) -> Option<&str> {
        let normalized = header.trim().to_lowercase();
        self.rules
            .iter()
            .find(|(keyword, _)| normalized.contains(keyword.as_str()))
            .map(|(_, canonical)| canonical.as_str())
    }

    /// Final column names, one per header, all distinct.
    ///
    /// A canonical label goes to the first header that claims it; later
    /// claimants keep their own header.
    pub fn rename(&self, headers: &[String]) -> Vec<String> {
        let mut used = HashSet::with_capacity(headers.len());
        let mut names = Vec::with_capacity(headers.len());

        for header in headers {
            let name = match self.canonical_for(header) {
                Some(canonical) if !used.contains(canonical) => {
                    if canonical != header.as_str() {
                        tracing::debug!("Renaming column '{}' -> '{}'", header, canonical);
                    }
                    canonical.to_string()
                }
                Some(canonical) => {
                    tracing::warn!(
                        "Column '{}' also matches '{}', which is already taken; keeping its original name",
                        header,
                        canonical
                    );
                    unique_name(header, &used)
                }
                None => unique_name(header, &used),
            };
            used.insert(name.clone());
            names.push(name);
        }

        names
    }
}

fn unique_name(base: &str, used: &HashSet<String>) -> String {
    if !used.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}.{}", base, n))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Source headers made usable as keys: blanks become `Unnamed: <index>`,
/// repeats get `.1`, `.2`, ... suffixes.
pub fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut used = HashSet::with_capacity(raw.len());
    raw.into_iter()
        .enumerate()
        .map(|(index, header)| {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {}", index)
            } else {
                header
            };
            let name = unique_name(&base, &used);
            used.insert(name.clone());
            name
        })
        .collect()
}
