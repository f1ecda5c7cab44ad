use crate::core::columns::{ColumnRule, LabelPreset};
use crate::core::loader::default_missing_markers;
use crate::core::ConfigProvider;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "tickets.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub output: OutputConfig,
    pub source: SourceConfig,
    pub columns: ColumnsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub missing_markers: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            missing_markers: default_missing_markers(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub labels: LabelPreset,
    /// Replaces the preset rules entirely when present.
    pub rules: Option<Vec<ColumnRule>>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConvertError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConvertError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("output.path", &self.output.path)?;

        if let Some(rules) = &self.columns.rules {
            for (index, rule) in rules.iter().enumerate() {
                validate_non_empty_string(&format!("columns.rules[{}].keyword", index), &rule.keyword)?;
                validate_non_empty_string(
                    &format!("columns.rules[{}].canonical", index),
                    &rule.canonical,
                )?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &Path {
        Path::new(&self.output.path)
    }

    fn column_rules(&self) -> Vec<ColumnRule> {
        match &self.columns.rules {
            Some(rules) => rules.clone(),
            None => self.columns.labels.rules(),
        }
    }

    fn missing_markers(&self) -> &[String] {
        &self.source.missing_markers
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
