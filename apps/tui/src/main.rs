//! World book TUI: interactive terminal front end for the converter.
//!
//! Paste or type pseudo-XML, convert it on a worker thread, and browse the
//! resulting Tavo document, built with `ratatui` + `crossterm`.

mod app;
mod screens;
mod widgets;

use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    let config = worldbook_shared::load_config()?;
    app::run(&config)
}
