//! Leadbook — command-line entry point.

mod cli;
mod error;

use std::process::ExitCode;

use clap::Parser;
use leadbook_core::clock::Clock;
use leadbook_core::display::relative_day_label;
use leadbook_core::models::FollowupWithLead;
use leadbook_core::repository::FollowupRepository;
use leadbook_db::repository::{SurrealFollowupRepository, SurrealLeadRepository};
use leadbook_db::{DbError, DbManager};
use leadbook_service::{FollowupService, LeadService, ServiceConfig};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::error::ServerError;

/// A follow-up row with its date described relative to today.
#[derive(Serialize)]
struct FollowupView {
    #[serde(flatten)]
    row: FollowupWithLead,
    when: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("leadbook=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let db_config = cli.db_config();
    if !db_config.is_configured() {
        return Err(ServerError::NotConfigured);
    }

    let manager = DbManager::connect(&db_config)
        .await
        .map_err(DbError::from)?;
    leadbook_db::run_migrations(manager.client()).await?;

    let leads = LeadService::new(SurrealLeadRepository::new(manager.handle()));
    let followups = FollowupService::with_system_clock(
        SurrealFollowupRepository::new(manager.handle()),
        ServiceConfig {
            upcoming_window_days: cli.upcoming_days,
        },
    );

    info!(command = ?cli.command, "Running command");
    let output = match cli.command {
        Commands::Dashboard => serde_json::to_value(followups.dashboard_stats().await?)?,
        Commands::Reminders => views(&followups, followups.todays_reminders().await?)?,
        Commands::Upcoming { days } => views(&followups, followups.upcoming(days).await?)?,
        Commands::Overdue => views(&followups, followups.overdue().await?)?,
        Commands::Priority { priority } => {
            views(&followups, followups.by_priority(priority).await?)?
        }
        Commands::LeadCounts => serde_json::to_value(leads.counts_by_status().await?)?,
        Commands::Search { query } => serde_json::to_value(leads.search(&query).await?)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn views<F: FollowupRepository, K: Clock>(
    svc: &FollowupService<F, K>,
    rows: Vec<FollowupWithLead>,
) -> Result<serde_json::Value, ServerError> {
    let today = svc.today();
    let views: Vec<FollowupView> = rows
        .into_iter()
        .map(|row| FollowupView {
            when: relative_day_label(row.followup.followup_date, today),
            row,
        })
        .collect();
    Ok(serde_json::to_value(views)?)
}
