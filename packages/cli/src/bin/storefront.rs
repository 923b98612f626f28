use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process;

mod cli;

use cli::admin::AdminCommands;
use storefront_cli::{run_server, Config};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront - marketing site backend and admin CMS")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
        #[arg(long, help = "SQLite database file (overrides DATABASE_PATH)")]
        database: Option<PathBuf>,
    },
    /// Manage admin accounts
    #[command(subcommand)]
    Admin(AdminCommands),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;

    match command {
        Commands::Serve { port, database } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(database) = database {
                config.database_path = database;
            }

            println!(
                "{} Starting Storefront API on {}:{}",
                "▶".green().bold(),
                config.bind_address,
                config.port
            );
            run_server(config).await
        }
        Commands::Admin(admin_cmd) => admin_cmd.execute(&config).await,
    }
}
