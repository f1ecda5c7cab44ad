use crate::config::toml_config::TomlConfig;
use crate::core::columns::LabelPreset;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "tickets-json")]
#[command(about = "Convert an exam ticket spreadsheet (xlsx, xls, csv) into tickets.json")]
pub struct CliConfig {
    /// Source spreadsheet or CSV; prompts with the files in the current directory when omitted
    pub source: Option<PathBuf>,

    /// Output JSON path [default: tickets.json]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Canonical column label set
    #[arg(long, value_enum)]
    pub labels: Option<LabelPreset>,

    /// Convert and report without writing the output file
    #[arg(long)]
    pub dry_run: bool,

    /// Never prompt for a source file
    #[arg(long)]
    pub no_prompt: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Log memory and timing after each stage")]
    pub monitor: bool,
}

impl CliConfig {
    /// Command-line values win over the config file.
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(output) = &self.output {
            config.output.path = output.clone();
            tracing::debug!("Output path overridden to: {}", output);
        }
        if let Some(labels) = self.labels {
            config.columns.labels = labels;
            if config.columns.rules.is_some() {
                tracing::warn!("--labels has no effect while the config file defines columns.rules");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use std::path::Path;

    #[test]
    fn test_parse_arguments() {
        let cli = CliConfig::parse_from([
            "tickets-json",
            "exam.xlsx",
            "-o",
            "out.json",
            "--labels",
            "en",
            "--dry-run",
        ]);
        assert_eq!(cli.source, Some(PathBuf::from("exam.xlsx")));
        assert_eq!(cli.output.as_deref(), Some("out.json"));
        assert_eq!(cli.labels, Some(LabelPreset::En));
        assert!(cli.dry_run);
        assert!(!cli.no_prompt);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = CliConfig::parse_from(["tickets-json", "--output", "x.json", "--labels", "en"]);
        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.output_path(), Path::new("x.json"));
        assert_eq!(config.column_rules(), LabelPreset::En.rules());
    }

    #[test]
    fn test_no_arguments_keeps_defaults() {
        let cli = CliConfig::parse_from(["tickets-json"]);
        assert!(cli.source.is_none());

        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.output_path(), Path::new("tickets.json"));
    }
}
