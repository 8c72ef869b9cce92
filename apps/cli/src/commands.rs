//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use worldbook_core::{ConversionHandler, EXAMPLE_INPUT, Orchestrator, completion_label};
use worldbook_shared::{AppConfig, ConvertOptions, MAX_INDENT, init_config, load_config};

/// Input path that means "read from stdin".
const STDIN_MARKER: &str = "-";

/// File stem used by `--save` when reading from stdin.
const STDIN_STEM: &str = "worldbook";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// World book converter: pseudo-XML entries to Tavo JSON.
#[derive(Parser)]
#[command(
    name = "worldbook",
    version,
    about = "Convert pseudo-XML world book entries into Tavo-format JSON.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert pseudo-XML entries into a Tavo JSON document.
    Convert {
        /// Input file, or `-` for stdin.
        #[arg(default_value = STDIN_MARKER)]
        input: String,

        /// Write the JSON to this file instead of stdout.
        #[arg(short, long, conflicts_with = "save")]
        out: Option<PathBuf>,

        /// Write the JSON into the configured output directory.
        #[arg(long)]
        save: bool,

        /// Spaces per indent level, 0 to 8 (overrides config).
        #[arg(long, value_parser = parse_indent)]
        indent: Option<usize>,
    },

    /// Print a sample pseudo-XML entry.
    Example,

    /// Launch the interactive TUI.
    Tui,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries JSON.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "worldbook=warn",
        1 => "worldbook=info",
        2 => "worldbook=debug",
        _ => "worldbook=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert {
            input,
            out,
            save,
            indent,
        } => cmd_convert(&input, out.as_deref(), save, indent).await,
        Command::Example => cmd_example(),
        Command::Tui => cmd_tui(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// convert
// ---------------------------------------------------------------------------

async fn cmd_convert(
    input: &str,
    out: Option<&Path>,
    save: bool,
    indent: Option<usize>,
) -> Result<()> {
    let config = load_config()?;
    let mut options = ConvertOptions::from(&config);
    if let Some(indent) = indent {
        options.indent = indent;
    }
    options.validate()?;

    let raw = read_input(input)?;
    info!(input, bytes = raw.len(), indent = options.indent, "converting world book");

    let mut orchestrator = Orchestrator::new(options);
    orchestrator.request_conversion(raw)?;

    let mut handler = CliHandler::new();
    orchestrator.run_to_completion(&mut handler).await;

    let (json, entry_count) = match handler.outcome {
        Some(Ok(result)) => result,
        Some(Err(message)) => return Err(eyre!(message)),
        None => return Err(eyre!("conversion ended without a result")),
    };

    let destination = match out {
        Some(path) => Some(path.to_path_buf()),
        None if save => Some(save_path(&config, input)),
        None => None,
    };

    match destination {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| eyre!("cannot create {}: {e}", parent.display()))?;
            }
            std::fs::write(&path, format!("{json}\n"))
                .map_err(|e| eyre!("cannot write {}: {e}", path.display()))?;
            eprintln!("{}", completion_label(entry_count));
            eprintln!("  Output: {}", path.display());
        }
        None => {
            println!("{json}");
            eprintln!("{}", completion_label(entry_count));
        }
    }

    Ok(())
}

/// Clap value parser for `--indent`.
fn parse_indent(s: &str) -> std::result::Result<usize, String> {
    let indent: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a non-negative integer"))?;
    if indent > MAX_INDENT {
        return Err(format!("indent must be at most {MAX_INDENT}"));
    }
    Ok(indent)
}

/// Read the whole input from a file or stdin.
fn read_input(input: &str) -> Result<String> {
    if input == STDIN_MARKER {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| eyre!("cannot read stdin: {e}"))?;
        return Ok(buf);
    }

    std::fs::read_to_string(input).map_err(|e| eyre!("cannot read '{input}': {e}"))
}

/// `<output_dir>/<input stem>.<file_suffix>`.
fn save_path(config: &AppConfig, input: &str) -> PathBuf {
    let stem = if input == STDIN_MARKER {
        STDIN_STEM.to_string()
    } else {
        Path::new(input)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| STDIN_STEM.to_string())
    };

    PathBuf::from(&config.output.output_dir)
        .join(format!("{stem}.{}", config.output.file_suffix))
}

// ---------------------------------------------------------------------------
// CLI conversion handler
// ---------------------------------------------------------------------------

/// Shows status labels on an indicatif spinner and keeps the final outcome.
struct CliHandler {
    spinner: ProgressBar,
    outcome: Option<std::result::Result<(String, usize), String>>,
}

impl CliHandler {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self {
            spinner,
            outcome: None,
        }
    }
}

impl ConversionHandler for CliHandler {
    fn on_status(&mut self, label: &str) {
        self.spinner.set_message(label.to_string());
    }

    fn on_success(&mut self, json: String, entry_count: usize) {
        self.spinner.finish_and_clear();
        self.outcome = Some(Ok((json, entry_count)));
    }

    fn on_failure(&mut self, message: &str) {
        self.spinner.finish_and_clear();
        self.outcome = Some(Err(message.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Other commands
// ---------------------------------------------------------------------------

fn cmd_example() -> Result<()> {
    println!("{EXAMPLE_INPUT}");
    Ok(())
}

fn cmd_tui() -> Result<()> {
    info!("launching TUI");

    let status = std::process::Command::new("worldbook-tui")
        .stdin(std::process::Stdio::inherit())
        .stdout(std::process::Stdio::inherit())
        .stderr(std::process::Stdio::inherit())
        .status()
        .map_err(|e| eyre!("failed to launch worldbook-tui: {e}. Is it installed on PATH?"))?;

    if !status.success() {
        return Err(eyre!(
            "worldbook-tui exited with status: {}",
            status.code().unwrap_or(-1)
        ));
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
