pub mod discovery;
pub mod pipelines;
