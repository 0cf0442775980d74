//! Command-line arguments for the `leadbook` binary.

use clap::{Parser, Subcommand};
use leadbook_core::models::Priority;
use leadbook_core::repository::PriorityFilter;
use leadbook_db::DbConfig;

/// Leadbook - leads and follow-up reminders backed by SurrealDB.
#[derive(Parser, Debug)]
#[command(name = "leadbook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SurrealDB WebSocket endpoint
    #[arg(long, env = "LEADBOOK_DB_URL", default_value = "127.0.0.1:8000")]
    pub db_url: String,

    /// SurrealDB namespace
    #[arg(long, env = "LEADBOOK_DB_NS", default_value = "leadbook")]
    pub db_namespace: String,

    /// SurrealDB database
    #[arg(long, env = "LEADBOOK_DB_NAME", default_value = "main")]
    pub db_name: String,

    /// Root username
    #[arg(long, env = "LEADBOOK_DB_USER", default_value = "root")]
    pub db_user: String,

    /// Root password
    #[arg(long, env = "LEADBOOK_DB_PASS", default_value = "root", hide_env_values = true)]
    pub db_pass: String,

    /// Days ahead covered by `upcoming` when --days is not given
    #[arg(long, env = "LEADBOOK_UPCOMING_DAYS", default_value_t = 7)]
    pub upcoming_days: u32,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            url: self.db_url.clone(),
            namespace: self.db_namespace.clone(),
            database: self.db_name.clone(),
            username: self.db_user.clone(),
            password: self.db_pass.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Follow-up counters: total, pending, due today, high priority, overdue
    Dashboard,

    /// Pending follow-ups whose reminder window includes today
    Reminders,

    /// Pending follow-ups due in the next few days
    Upcoming {
        /// Window length in days (inclusive of today)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Pending follow-ups dated before today
    Overdue,

    /// Pending follow-ups of one priority, or `all`
    Priority {
        #[arg(value_parser = parse_priority_filter)]
        priority: PriorityFilter,
    },

    /// Lead counts per status
    LeadCounts,

    /// Search leads by name, email or phone
    Search { query: String },
}

fn parse_priority_filter(s: &str) -> Result<PriorityFilter, String> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(PriorityFilter::All);
    }
    s.parse::<Priority>()
        .map(PriorityFilter::Only)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_argument_accepts_all_sentinel() {
        assert_eq!(parse_priority_filter("ALL"), Ok(PriorityFilter::All));
        assert_eq!(
            parse_priority_filter("high"),
            Ok(PriorityFilter::Only(Priority::High))
        );
        assert!(parse_priority_filter("urgent").is_err());
    }

    #[test]
    fn parses_upcoming_with_days() {
        let cli = Cli::try_parse_from(["leadbook", "upcoming", "--days", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Upcoming { days: Some(3) }));
        assert!(cli.db_config().is_configured());
    }
}
