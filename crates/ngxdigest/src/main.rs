//! ngxdigest CLI - daily per-project digest of nginx error logs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod output;
mod run;

use cli::Cli;

/// Exit code for an unknown server name
const EXIT_INVALID_SERVER: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Secrets such as the Slack webhook may live in a .env file
    let _ = dotenvy::dotenv();

    output::set_json_mode(cli.json);
    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "ngxdigest={0},ngxdigest_core={0},ngxdigest_logs={0},ngxdigest_notify={0}",
                    log_level
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = run::execute(cli).await {
        let code = match e.downcast_ref::<ngxdigest_core::Error>() {
            Some(ngxdigest_core::Error::InvalidServer(_)) => EXIT_INVALID_SERVER,
            _ => 1,
        };
        eprintln!("Error: {}", e);
        std::process::exit(code);
    }

    Ok(())
}
