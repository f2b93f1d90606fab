//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use quill_core::config::{self, Config};

#[derive(Parser)]
#[command(name = "quill")]
#[command(version = "0.1")]
#[command(about = "Streaming chat client for a Claude gateway")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Starts an interactive chat
    Chat,
    /// Sends a single prompt and prints the response
    Exec {
        /// The prompt to send
        prompt: String,

        /// Attach a file (repeatable); uses the one-shot upload path
        #[arg(long, value_name = "FILE")]
        attach: Vec<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(dispatch(cli))
}

async fn dispatch(cli: Cli) -> Result<()> {
    // default to chat mode
    let command = cli.command.unwrap_or(Commands::Chat);

    match command {
        Commands::Chat => {
            let config = Config::load().context("load config")?;
            crate::modes::chat::run_chat(&config).await
        }
        Commands::Exec { prompt, attach } => {
            let config = Config::load().context("load config")?;
            if attach.is_empty() {
                crate::modes::exec::run_exec(&prompt, &config).await
            } else {
                crate::modes::exec::run_upload(&prompt, &attach, &config).await
            }
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                println!("{}", config::paths::config_path().display());
                Ok(())
            }
            ConfigCommands::Init => {
                let path = config::paths::config_path();
                Config::init(&path)?;
                println!("Created config at {}", path.display());
                Ok(())
            }
        },
    }
}

/// Enables stderr tracing when RUST_LOG is set; silent otherwise so
/// diagnostics never interleave with streamed output by default.
fn init_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        use tracing_subscriber::EnvFilter;

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }
}
