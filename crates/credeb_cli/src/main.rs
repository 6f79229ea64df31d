//! `credeb` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Open the ledger database and bind the requested namespace.
//! - Act as input, confirmation and presentation layer over `credeb_core`.

mod cli;
mod commands;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use credeb_core::db::open_db;
use credeb_core::{default_log_level, init_logging, LedgerStore, SqliteKvRepository};
use log::info;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        start_logging(cli.log_level.as_deref(), log_dir)?;
    }

    let mut conn = open_db(&cli.db)
        .with_context(|| format!("failed to open ledger database `{}`", cli.db.display()))?;
    let repo = SqliteKvRepository::try_new(&mut conn)?;
    let mut store = LedgerStore::open(repo, cli.ledger.clone());
    info!(
        "event=cli_start module=cli status=ok namespace={} db={}",
        cli.ledger,
        cli.db.display()
    );

    commands::run(&mut store, cli.command, &cli.currency)
}

fn start_logging(level: Option<&str>, log_dir: &Path) -> Result<()> {
    let log_dir = if log_dir.is_absolute() {
        log_dir.to_path_buf()
    } else {
        std::env::current_dir()
            .context("failed to resolve current directory for --log-dir")?
            .join(log_dir)
    };
    init_logging(log_level(level), &log_dir)?;
    Ok(())
}

fn log_level(requested: Option<&str>) -> &str {
    requested.unwrap_or(default_log_level())
}

#[cfg(test)]
mod tests {
    use super::log_level;
    use credeb_core::default_log_level;

    #[test]
    fn log_level_borrows_requested_value() {
        let requested = String::from("warn");
        assert_eq!(log_level(Some(requested.as_str())), "warn");
        assert_eq!(log_level(None), default_log_level());
    }
}
