//! Port Assassin CLI - Watch and free network ports
//!
//! A command-line tool for listing listening ports, killing their
//! processes, and watching ports for ownership changes.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "port-assassin")]
#[command(author, version, about = "Watch and free network ports")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List all listening ports
    #[command(alias = "ls")]
    List {
        /// Filter by port number
        #[arg(short, long)]
        port: Option<u16>,

        /// Filter by process name
        #[arg(short = 'n', long)]
        name: Option<String>,
    },

    /// Kill a process by PID, or whatever listens on a port
    Kill {
        /// Process ID to kill
        #[arg(required_unless_present = "port", conflicts_with = "port")]
        pid: Option<u32>,

        /// Kill the process listening on this port instead
        #[arg(short, long)]
        port: Option<u16>,

        /// Send SIGTERM first and only SIGKILL if the process survives
        #[arg(short, long)]
        graceful: bool,

        /// Kill through sudo, reading the password from stdin
        #[arg(long, conflicts_with_all = ["graceful", "port"])]
        sudo: bool,
    },

    /// Watch ports for processes taking or freeing them
    Watch {
        #[command(subcommand)]
        action: WatchAction,
    },

    /// Turn watch notifications on or off
    Notifications {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum WatchAction {
    /// Run the watch loop until interrupted
    Run {
        /// Seconds between checks
        #[arg(short, long, default_value_t = 2)]
        interval: u64,
    },
    /// Add a port to the watch list
    Add { port: u16 },
    /// Remove a port from the watch list
    #[command(alias = "rm")]
    Remove { port: u16 },
    /// List all watched ports
    #[command(alias = "ls")]
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Some(Commands::List { port, name }) => {
            commands::list::run(port, name, cli.json).await?;
        }
        Some(Commands::Kill {
            pid,
            port,
            graceful,
            sudo,
        }) => {
            commands::kill::run(pid, port, graceful, sudo).await?;
        }
        Some(Commands::Watch { action }) => match action {
            WatchAction::Run { interval } => commands::watch::run(interval, cli.json).await?,
            WatchAction::Add { port } => commands::watch::add(port).await?,
            WatchAction::Remove { port } => commands::watch::remove(port).await?,
            WatchAction::List => commands::watch::list(cli.json).await?,
        },
        Some(Commands::Notifications { state }) => {
            commands::config::set_notifications(matches!(state, Toggle::On)).await?;
        }
        Some(Commands::Config) => {
            commands::config::show(cli.json).await?;
        }
        None => {
            commands::list::run(None, None, cli.json).await?;
        }
    }

    Ok(())
}

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
