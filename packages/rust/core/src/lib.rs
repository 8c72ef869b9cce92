//! Conversion pipeline and orchestration for world book entries.
//!
//! This crate ties the pseudo-XML parser to the Tavo formatter and runs the
//! whole thing off the interactive thread (see [`orchestrator`]).

pub mod formatter;
pub mod orchestrator;
pub mod pipeline;
pub mod sample;
pub mod status;

pub use orchestrator::{ConversionEvent, ConversionHandler, Orchestrator};
pub use pipeline::{ProgressReporter, SilentProgress, convert, validate_input};
pub use sample::EXAMPLE_INPUT;
pub use status::{
    CLEARED_LABEL, ConversionState, EXAMPLE_LOADED_LABEL, READY_LABEL, completion_label,
};
