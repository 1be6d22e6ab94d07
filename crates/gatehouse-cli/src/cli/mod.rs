//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::Config;
use crate::logging;

mod commands;

#[derive(Parser)]
#[command(name = "gatehouse")]
#[command(version)]
#[command(about = "Admin console login client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in to the admin console
    Login {
        /// Console base URL (overrides config)
        #[arg(long, value_name = "URL")]
        console_url: Option<String>,

        /// Username (prompted if not provided)
        #[arg(long)]
        username: Option<String>,

        /// Destination to land on after login
        #[arg(long, value_name = "PATH")]
        next: Option<String>,
    },

    /// Manage the cached session
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// Shows the cached session, if any
    Show,
    /// Removes the cached session file
    Clear,
    /// Shows the path to the session cache file
    Path,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the console base URL
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    match cli.command {
        Commands::Login {
            console_url,
            username,
            next,
        } => {
            let config = Config::load()?;
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            runtime.block_on(commands::login::run(&config, console_url, username, next))
        }
        Commands::Session { command } => match command {
            SessionCommands::Show => commands::session::show(),
            SessionCommands::Clear => commands::session::clear(),
            SessionCommands::Path => commands::session::path(),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        },
    }
}
