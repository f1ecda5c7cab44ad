use crate::core::columns::ColumnRule;
use crate::domain::model::{ConversionReport, RawTable, TransformResult};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

pub trait Storage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
    /// Absolute form of `path` as this storage would resolve it.
    fn resolve(&self, path: &Path) -> PathBuf;
}

pub trait ConfigProvider {
    fn output_path(&self) -> &Path;
    fn column_rules(&self) -> Vec<ColumnRule>;
    fn missing_markers(&self) -> &[String];
}

pub trait Pipeline {
    fn extract(&self) -> Result<RawTable>;
    fn transform(&self, table: RawTable) -> Result<TransformResult>;
    fn load(&self, result: TransformResult) -> Result<ConversionReport>;
    fn preview(&self, result: TransformResult) -> ConversionReport;
}
