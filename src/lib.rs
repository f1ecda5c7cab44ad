pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::{toml_config::TomlConfig, LocalStorage};

pub use app::pipelines::TicketPipeline;
pub use core::engine::ConversionEngine;
pub use utils::error::{ConvertError, Result};
