use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use tickets_json::app::discovery;
use tickets_json::domain::model::ConversionReport;
use tickets_json::utils::{logger, validation::Validate};
use tickets_json::{CliConfig, ConversionEngine, LocalStorage, TicketPipeline, TomlConfig};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // init logging
    logger::init_cli_logger(cli.verbose, cli.log_json);
    tracing::debug!("CLI config: {:?}", cli);

    // load config, then apply command-line overrides
    let mut config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                println!("❌ Failed to load config file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => TomlConfig::default(),
    };
    cli.apply_overrides(&mut config);

    // validate config
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        println!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // pick the source file
    let source = resolve_source(&cli)?;
    if !source.exists() {
        println!("❌ File not found: {}", source.display());
        std::process::exit(1);
    }

    // build storage, pipeline and engine
    let storage = LocalStorage::new(".");
    let pipeline = TicketPipeline::new(storage, config, source);
    let mut engine = ConversionEngine::new_with_monitoring(pipeline, cli.monitor);

    let outcome = if cli.dry_run {
        engine.dry_run()
    } else {
        engine.run()
    };

    match outcome {
        Ok(report) => print_summary(&report),
        Err(e) => {
            // print a diagnostic; exit status stays 0
            tracing::error!("Conversion failed: {} (Category: {:?})", e, e.category());
            println!("❌ {}", e.user_friendly_message());
            println!("\nMake sure that:");
            for (index, hint) in e.recovery_suggestion().iter().enumerate() {
                println!("{}. {}", index + 1, hint);
            }
        }
    }

    Ok(())
}

fn resolve_source(cli: &CliConfig) -> anyhow::Result<PathBuf> {
    if let Some(source) = &cli.source {
        return Ok(source.clone());
    }
    if cli.no_prompt {
        return Ok(PathBuf::new());
    }

    let mut stdout = io::stdout();
    discovery::prompt_for_source(Path::new("."), &mut io::stdin().lock(), &mut stdout)
        .context("failed to read the source file selection")
}

fn print_summary(report: &ConversionReport) {
    if report.written {
        println!("✅ Converted {} tickets", report.record_count);
        println!("📁 Saved to: {}", report.output_path.display());
    } else {
        println!("🔍 Dry run: {} tickets would be written", report.record_count);
        println!("📁 Target: {}", report.output_path.display());
    }
    println!("\nColumns: {:?}", report.columns);
    tracing::info!(
        "Read {} ({} missing rows and {} blank records skipped)",
        report.format,
        report.dropped_blank_rows,
        report.dropped_after_cleaning
    );
}
