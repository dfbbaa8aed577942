//! md2-export library
//!
//! Provides MD2 inspection and export for use by the CLI and other tools.

pub mod config;
pub mod export;
pub mod sink;

pub use config::ClipConfig;
pub use export::{export_md2, inspect_md2, ExportOptions, ExportSummary};
pub use sink::FileSink;
