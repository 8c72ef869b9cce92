//! Shared types, error model, and configuration for the world book converter.
//!
//! This crate is the foundation depended on by all other worldbook crates.
//! It provides:
//! - [`WorldBookError`]: the unified error type
//! - Domain types ([`FieldMap`], [`NormalizedEntry`], [`TavoDocument`])
//! - Configuration ([`AppConfig`], [`ConvertOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ConvertOptions, MAX_INDENT, OutputConfig, TuiConfig, config_dir, config_file_path,
    init_config, init_config_at, load_config, load_config_from,
};
pub use error::{Result, WorldBookError};
pub use types::{
    ConversionOutput, DEFAULT_NAME, DEFAULT_UNKNOWN, EntryContent, EntryMetadata, FieldMap,
    NormalizedEntry, Statistics, TAVO_FORMAT_VERSION, TAVO_GENERATOR, TavoDocument, TavoEnvelope,
};
