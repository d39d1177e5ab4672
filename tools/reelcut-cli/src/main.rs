//! reelcut CLI: find highlights in gameplay recordings and cut them out.
//!
//! Usage:
//!   reelcut analyze <VIDEO>     Detect sessions and events, optionally export clips
//!   reelcut batch <FOLDER>      Analyze every matching video under a folder
//!   reelcut probe <VIDEO>       Show video stream information
//!   reelcut check               Check tools and reference patterns

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use reelcut_common::config::{config_file_path, AppConfig};

mod commands;

use commands::analyze::AnalyzeOptions;

#[derive(Parser)]
#[command(
    name = "reelcut",
    about = "Automatic highlight clips from gameplay recordings",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/reelcut/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single video
    Analyze {
        /// Path to the video file
        video: PathBuf,

        #[command(flatten)]
        options: AnalyzeOptions,
    },

    /// Search a folder for videos and analyze each one
    Batch {
        /// Folder to search recursively
        folder: PathBuf,

        /// File name pattern to match
        #[arg(long, default_value = "*.mp4")]
        name: String,

        #[command(flatten)]
        options: AnalyzeOptions,
    },

    /// Show video stream information
    Probe {
        /// Path to the video file
        video: PathBuf,
    },

    /// Check system tools and reference patterns
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = effective_config_path(cli.config.as_deref());
    let (mut config, load_error) = match &cli.config {
        Some(path) => (
            AppConfig::load_from(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None,
        ),
        None => AppConfig::load(),
    };

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    reelcut_common::logging::init_logging(&config.logging);

    if let Some(e) = load_error {
        tracing::warn!(
            path = %config_path.display(),
            error = %e,
            "Failed to load config, using defaults"
        );
    }

    match cli.command {
        Commands::Analyze { video, options } => commands::analyze::run(video, options, config),
        Commands::Batch {
            folder,
            name,
            options,
        } => commands::batch::run(folder, name, options, config),
        Commands::Probe { video } => commands::probe::run(video, &config),
        Commands::Check => commands::check::run(&config, &config_path),
    }
}

/// The config file in effect: `--config` if given, else the standard location.
fn effective_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map(Path::to_path_buf).unwrap_or_else(config_file_path)
}
