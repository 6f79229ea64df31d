//! Command-line surface and configuration.

use clap::{Parser, Subcommand, ValueEnum};
use credeb_core::{Namespace, TransactionKind};
use std::path::PathBuf;

/// Personal credit/payment ledger with follow-up dues.
#[derive(Debug, Parser)]
#[command(name = "credeb", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite file holding every ledger
    #[arg(long, env = "CREDEB_DB", default_value = "credeb.sqlite3", global = true)]
    pub db: PathBuf,

    /// Active ledger namespace (`purchase`, `sales`, ...)
    #[arg(long, short = 'l', env = "CREDEB_LEDGER", default_value = "purchase", global = true)]
    pub ledger: Namespace,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "CREDEB_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, env = "CREDEB_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Currency symbol used when printing amounts
    #[arg(long, env = "CREDEB_CURRENCY", default_value = "₹", global = true)]
    pub currency: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage people in the active ledger
    Person {
        #[command(subcommand)]
        action: PersonAction,
    },

    /// Record credits and payments
    Txn {
        #[command(subcommand)]
        action: TxnAction,
    },

    /// Manage follow-up reminders
    Due {
        #[command(subcommand)]
        action: DueAction,
    },

    /// Per-person credit, payment and balance totals
    Summary {
        /// Only people whose name contains this text (case-insensitive)
        #[arg(long, short)]
        filter: Option<String>,
    },

    /// Transaction log in insertion order
    History {
        /// Only transactions of this person
        #[arg(long, short)]
        person: Option<String>,
    },

    /// Bar chart of balances
    Chart,

    /// Write the transaction log as `<ledger>_transactions.csv`
    Export {
        /// Target directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print the core engine version
    Version,
}

#[derive(Debug, Subcommand)]
pub enum PersonAction {
    /// Add a person (duplicates are ignored)
    Add { name: String },
    /// Delete a person together with all their transactions and dues
    Delete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// List people in insertion order
    List,
}

#[derive(Debug, Subcommand)]
pub enum TxnAction {
    /// Add a transaction for an existing person
    Add {
        person: String,
        /// Calendar date, e.g. 2024-01-31
        date: String,
        /// Positive amount
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[arg(long, short, value_enum, default_value_t = KindArg::Credit)]
        kind: KindArg,
    },
}

#[derive(Debug, Subcommand)]
pub enum DueAction {
    /// Add a reminder to settle with a creditor
    Add {
        creditor: String,
        date: String,
        #[arg(long, short)]
        contact: Option<String>,
    },
    /// List reminders in insertion order
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Credit,
    Payment,
}

impl From<KindArg> for TransactionKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Credit => TransactionKind::Credit,
            KindArg::Payment => TransactionKind::Payment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, KindArg, TxnAction};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn txn_add_accepts_hyphenated_amount_for_later_validation() {
        let cli = Cli::parse_from(["credeb", "--ledger", "sales", "txn", "add", "Bob", "d", "-5"]);
        assert_eq!(cli.ledger.as_str(), "sales");
        match cli.command {
            Command::Txn {
                action: TxnAction::Add { amount, kind, .. },
            } => {
                assert_eq!(amount, "-5");
                assert_eq!(kind, KindArg::Credit);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
