pub mod cleaning;
pub mod columns;
pub mod engine;
pub mod loader;
pub mod normalizer;

pub use crate::domain::model::{ConversionReport, RawTable, Record, SourceFormat, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
