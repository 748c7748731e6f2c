mod cmd;
mod output;

use clap::{Parser, Subcommand};
use fms_core::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fms-checkin",
    about = "Trip check-in proxy for the FMS dispatch API",
    version,
    propagate_version = true
)]
struct Cli {
    /// Settings file (default: ./fms.yaml when present). Secrets always come
    /// from FMS_USER and FMS_PASS.
    #[arg(long, global = true, env = "FMS_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP proxy (POST /api/fms)
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, env = "PORT", default_value = "3000")]
        port: u16,
    },

    /// List a trip's tasks
    Tasks {
        /// Trip number, e.g. B01KJY
        trip_no: String,
    },

    /// Verify the FMS credentials by logging in once
    Login,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = Config::load(cli.config.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|config| match cli.command {
            Commands::Serve { port } => cmd::serve::run(config, port),
            Commands::Tasks { trip_no } => cmd::tasks::run(config, &trip_no, cli.json),
            Commands::Login => cmd::login::run(config, cli.json),
        });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
