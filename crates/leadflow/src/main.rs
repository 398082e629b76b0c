// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leadflow - lead follow-up scheduling and dispatch engine.
//!
//! This is the binary entry point. Dispatch is poll-driven: an external
//! trigger (cron, systemd timer) runs `leadflow dispatch` on a cadence;
//! there is no in-process scheduler. `Utc::now()` is read once here at the
//! boundary and passed explicitly into the engine.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use leadflow_config::LeadflowConfig;
use leadflow_core::types::AdapterType;
use leadflow_core::{LeadflowError, StorageAdapter, TransportAdapter};
use leadflow_email::EmailTransport;
use leadflow_sms::SmsTransport;
use leadflow_storage::SqliteStorage;

mod dispatch;
mod ingest;
mod respond;
mod status;

/// Leadflow - lead follow-up scheduling and dispatch engine.
#[derive(Parser, Debug)]
#[command(name = "leadflow", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest a lead: draft its sequence, schedule follow-ups, send the
    /// immediate reply.
    Ingest {
        #[arg(long)]
        name: String,
        #[arg(long)]
        service: String,
        #[arg(long)]
        interest: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Synthesize a lead from a missed call.
    MissedCall {
        #[arg(long)]
        phone: String,
    },
    /// Process one batch of due follow-up jobs (invoke on a cadence).
    Dispatch,
    /// Record an inbound reply, canceling the lead's pending follow-ups.
    Respond {
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Show lead and job queue counts.
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match leadflow_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            leadflow_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    if let Err(e) = run(cli, &config).await {
        eprintln!("leadflow: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &LeadflowConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.agent.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, config: &LeadflowConfig) -> Result<(), LeadflowError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;

    let result = match cli.command {
        Commands::Ingest {
            name,
            service,
            interest,
            phone,
            email,
        } => ingest::run_ingest(&storage, config, name, service, interest, phone, email).await,
        Commands::MissedCall { phone } => ingest::run_missed_call(&storage, config, phone).await,
        Commands::Dispatch => dispatch::run_dispatch(&storage, config).await,
        Commands::Respond { phone, body } => respond::run_respond(&storage, &phone, &body).await,
        Commands::Status => status::run_status(&storage).await,
    };

    storage.close().await?;
    result
}

/// Resolve the configured outbound transport by name.
pub(crate) fn resolve_transport(
    config: &LeadflowConfig,
) -> Result<Box<dyn TransportAdapter>, LeadflowError> {
    match config.dispatch.transport.as_str() {
        "sms" => Ok(Box::new(SmsTransport::from_config(&config.sms)?)),
        "email" => Ok(Box::new(EmailTransport::from_config(&config.email)?)),
        other => Err(LeadflowError::AdapterNotFound {
            adapter_type: AdapterType::Transport.to_string(),
            name: other.to_string(),
        }),
    }
}
