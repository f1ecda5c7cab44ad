use crate::core::loader::load_table;
use crate::core::normalizer::normalize;
use crate::core::{
    ConfigProvider, ConversionReport, Pipeline, RawTable, Result, Storage, TransformResult,
};
use crate::utils::error::ConvertError;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Reads one ticket table from `source` and writes it as a JSON array.
pub struct TicketPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) source: PathBuf,
}

impl<S: Storage, C: ConfigProvider> TicketPipeline<S, C> {
    pub fn new(storage: S, config: C, source: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            config,
            source: source.into(),
        }
    }

    fn report(&self, result: TransformResult, written: bool) -> ConversionReport {
        ConversionReport {
            record_count: result.records.len(),
            output_path: self.storage.resolve(self.config.output_path()),
            columns: result.columns,
            format: result.format,
            dropped_blank_rows: result.dropped_blank_rows,
            dropped_after_cleaning: result.dropped_after_cleaning,
            written,
        }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for TicketPipeline<S, C> {
    fn extract(&self) -> Result<RawTable> {
        tracing::debug!("Reading source file: {}", self.source.display());
        let bytes = self.storage.read_file(&self.source).map_err(|e| match e {
            ConvertError::Io(io) if io.kind() == ErrorKind::NotFound => {
                ConvertError::SourceNotFound {
                    path: self.source.clone(),
                }
            }
            other => other,
        })?;

        load_table(&self.source, &bytes, self.config.missing_markers())
    }

    fn transform(&self, table: RawTable) -> Result<TransformResult> {
        Ok(normalize(table, &self.config.column_rules()))
    }

    fn load(&self, result: TransformResult) -> Result<ConversionReport> {
        // Serialize fully before touching the destination.
        let json = serde_json::to_string_pretty(&result.records)?;

        tracing::debug!(
            "Writing {} records ({} bytes) to {}",
            result.records.len(),
            json.len(),
            self.config.output_path().display()
        );
        self.storage
            .write_file(self.config.output_path(), json.as_bytes())?;

        Ok(self.report(result, true))
    }

    fn preview(&self, result: TransformResult) -> ConversionReport {
        self.report(result, false)
    }
}
