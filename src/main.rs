//! Issue Tracker
//!
//! Main entry point for the issue tracker server.

use clap::{Parser, Subcommand};
use issue_tracker::api::IssueServer;
use issue_tracker::config::{validate_config_result, ServerConfig};
use std::path::PathBuf;
use std::process;

/// Issue Tracker - project-scoped issue tracking API
#[derive(Parser, Debug)]
#[command(name = "issue-tracker")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/issue-tracker/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Storage connection string (e.g. sqlite://issues.db, sqlite::memory:)
    #[arg(long)]
    database_url: Option<String>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Default)]
enum Commands {
    /// Run the HTTP server (default)
    #[default]
    Serve,

    /// Load and validate configuration, then exit
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> issue_tracker::Result<()> {
    let config = load_config(&cli)?;

    match cli.command.unwrap_or_default() {
        Commands::Serve => {
            if let Err(e) = issue_tracker::logging::init(config.log_format) {
                eprintln!("Failed to initialize logging: {}", e);
            }

            tracing::info!(
                database_url = %config.database_url,
                addr = %config.bind_addr(),
                "Starting issue tracker"
            );

            let server = IssueServer::connect(&config)?;
            server.run(&config.bind_addr()).await?;
        }
        Commands::CheckConfig => {
            println!("Configuration OK");
            println!("  database_url:  {}", config.database_url);
            println!("  listen:        {}", config.bind_addr());
            println!("  max_body_size: {}", config.max_body_size);
            println!("  log_format:    {}", config.log_format);
            if let Some(ref id) = config.test_issue_id {
                println!("  test_issue_id: {}", id);
            }
        }
    }

    Ok(())
}

/// Defaults, then file, then environment, then flags
fn load_config(cli: &Cli) -> issue_tracker::Result<ServerConfig> {
    let mut config = ServerConfig::load_or_default(cli.config.as_deref())?;
    config.apply_env()?;

    if let Some(ref url) = cli.database_url {
        config.database_url = url.clone();
    }
    if let Some(ref host) = cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    validate_config_result(&config)?;
    Ok(config)
}
