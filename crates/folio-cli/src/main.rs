use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use folio_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "A terminal portfolio with smooth scrolling and reveal animations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Skip the loading sequence
    #[arg(long, global = true)]
    no_intro: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the portfolio in the terminal
    Run,
    /// Drive the engine headlessly and print a frame trace
    Simulate {
        /// Simulated duration in seconds
        #[arg(long, default_value_t = 3.0)]
        seconds: f64,
        /// Frames per simulated second
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Section id to smooth-scroll to on the first frame
        #[arg(long)]
        navigate: Option<String>,
        /// Wheel delta in pixels applied on the first frame (repeatable)
        #[arg(long, allow_negative_numbers = true)]
        wheel: Vec<f64>,
        /// Print one JSON object per frame
        #[arg(long)]
        json: bool,
        /// Pace frames against the wall clock
        #[arg(long)]
        realtime: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration if none exists
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Route logs to a file while the TUI owns the terminal, stderr otherwise
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load()?;
    if cli.no_intro {
        config.ui.show_intro = false;
    }

    let tui = matches!(cli.command, Some(Commands::Run) | None);
    init_logging(&config, tui)?;

    // Handle commands
    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Simulate {
            seconds,
            fps,
            navigate,
            wheel,
            json,
            realtime,
        }) => {
            let options = commands::simulate::SimulateOptions {
                seconds,
                fps,
                navigate,
                wheel,
                ..Default::default()
            };
            commands::simulate::run(config, options, json, realtime).await
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Init { force } => commands::config::init(force),
        },
    }
}
