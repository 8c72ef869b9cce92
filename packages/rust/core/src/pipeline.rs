//! End-to-end conversion: raw pseudo-XML → parse → normalize → document → JSON.
//!
//! This is the synchronous core the orchestrator runs on its worker thread.
//! It has no suspension points and owns every intermediate value.

use std::time::Instant;

use tracing::{info, instrument};

use worldbook_shared::{ConversionOutput, ConvertOptions, Result, WorldBookError};

use crate::formatter;
use crate::status::ConversionState;

/// Progress callback for reporting pipeline phases.
pub trait ProgressReporter: Send + Sync {
    /// Called when the pipeline enters a new working state.
    fn phase(&self, state: ConversionState);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _state: ConversionState) {}
}

/// Reject empty or whitespace-only input before any work is scheduled.
pub fn validate_input(raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        return Err(WorldBookError::EmptyInput);
    }
    Ok(())
}

/// Run the full conversion.
///
/// 1. Validate: empty input never reaches the parser
/// 2. Parse: one field map per `<startl>…<endl>` block
/// 3. Format: normalize entries, build statistics, serialize
#[instrument(skip_all, fields(input_len = raw.len(), indent = options.indent))]
pub fn convert(
    raw: &str,
    options: &ConvertOptions,
    progress: &dyn ProgressReporter,
) -> Result<ConversionOutput> {
    validate_input(raw)?;
    options.validate()?;
    let start = Instant::now();

    // --- Phase 1: Parse ---
    progress.phase(ConversionState::Parsing);
    let field_maps = worldbook_parser::parse(raw);

    if field_maps.is_empty() {
        info!("input contained no entry blocks");
        return Err(WorldBookError::NoEntriesFound);
    }

    // --- Phase 2: Format ---
    progress.phase(ConversionState::Formatting);
    let entries = formatter::to_normalized_entries(&field_maps);
    let document = formatter::build_document(entries);
    let json = formatter::render_json(&document, options.indent)?;

    let output = ConversionOutput {
        json,
        entry_count: document.entries.len(),
    };

    info!(
        entry_count = output.entry_count,
        entry_types = document.statistics.entry_types.len(),
        json_len = output.json.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "conversion complete"
    );

    Ok(output)
}
