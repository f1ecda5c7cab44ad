use crate::domain::model::ConversionReport;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct ConversionEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ConversionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Extract, transform and write the output file.
    pub fn run(&mut self) -> Result<ConversionReport> {
        self.execute(true)
    }

    /// Extract and transform only; nothing is written.
    pub fn dry_run(&mut self) -> Result<ConversionReport> {
        self.execute(false)
    }

    fn execute(&mut self, write: bool) -> Result<ConversionReport> {
        tracing::info!("Starting conversion");

        // extract
        tracing::info!("Extracting data...");
        let table = self.pipeline.extract()?;
        tracing::info!("Extracted {} rows", table.rows.len());
        self.monitor.log_stats("Extract");

        // transform
        tracing::info!("Transforming data...");
        let result = self.pipeline.transform(table)?;
        tracing::info!("Transformed {} records", result.records.len());
        self.monitor.log_stats("Transform");

        // load, or just report in a dry run
        let report = if write {
            tracing::info!("Loading data...");
            self.pipeline.load(result)?
        } else {
            self.pipeline.preview(result)
        };
        self.monitor.log_stats("Load");

        Ok(report)
    }
}
