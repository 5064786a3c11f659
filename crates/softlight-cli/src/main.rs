//! softlight - screen soft light for video calls
//!
//! Opens the tint window, or inspects and edits the saved state without it.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "softlight")]
#[command(author, version, about = "Turn your screen into a soft light for video calls")]
#[command(long_about = "
Paints the whole window with a soft color so the display lights your face
during video calls. The chosen default color is saved between sessions.

Examples:
  softlight                           # Open the window
  softlight run --fullscreen          # Open fullscreen
  softlight show                      # Print the saved state
  softlight show --json               # Print the saved record as JSON
  softlight set-default '#ffe0b2'     # Save a default without the window
  softlight reset                     # Forget the saved state
")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the saved state (default: platform config dir)
    #[arg(long, global = true, env = "SOFTLIGHT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the soft light window (default)
    Run(RunArgs),

    /// Print the saved state
    Show(ShowArgs),

    /// Save a default color without opening the window
    SetDefault(SetDefaultArgs),

    /// Delete the saved state
    Reset,
}

/// Arguments for the `run` command.
#[derive(Args, Default)]
struct RunArgs {
    /// Start in fullscreen
    #[arg(short, long)]
    fullscreen: bool,

    /// Notification auto-hide delay in milliseconds
    #[arg(long, value_name = "MS")]
    notification_ms: Option<u64>,
}

/// Arguments for the `show` command.
#[derive(Args)]
struct ShowArgs {
    /// Print the raw record as JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the `set-default` command.
#[derive(Args)]
struct SetDefaultArgs {
    /// Color as #rgb, #rrggbb or #rrggbbaa
    color: String,
}

/// Installs the log subscriber on stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let data_dir = cli.data_dir.as_deref();
    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => commands::run::run(args, data_dir),
        Commands::Show(args) => commands::show::run(args, data_dir),
        Commands::SetDefault(args) => commands::set_default::run(args, data_dir),
        Commands::Reset => commands::reset::run(data_dir),
    }
}
