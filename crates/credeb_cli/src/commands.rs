//! Command execution against the active ledger store.

use crate::cli::{Command, DueAction, PersonAction, TxnAction};
use crate::render;
use anyhow::{bail, Context, Result};
use credeb_core::{
    balance_series, dues_rows, export_file_name, history_rows, parse_amount_checked, summary_rows,
    transactions_csv, ExportError, KvRepository, LedgerStore, MutationOutcome, StoreError,
    TransactionKind,
};
use log::info;
use std::io::{self, BufRead, Write};
use std::path::Path;

pub fn run<R: KvRepository>(
    store: &mut LedgerStore<R>,
    command: Command,
    currency: &str,
) -> Result<()> {
    match command {
        Command::Person { action } => person(store, action),
        Command::Txn { action } => txn(store, action),
        Command::Due { action } => due(store, action),
        Command::Summary { filter } => {
            println!("{}", store.namespace().title());
            print!(
                "{}",
                render::summary_table(
                    summary_rows(store.people(), store.transactions(), filter.as_deref()),
                    currency,
                )
            );
            Ok(())
        }
        Command::History { person } => {
            print!(
                "{}",
                render::history_table(
                    history_rows(store.transactions(), person.as_deref()),
                    currency,
                )
            );
            Ok(())
        }
        Command::Chart => {
            let series = balance_series(store.people(), store.transactions());
            print!("{}", render::balance_chart(&series, currency));
            Ok(())
        }
        Command::Export { out_dir } => export(store, &out_dir),
        Command::Version => {
            println!("credeb_core {}", credeb_core::core_version());
            Ok(())
        }
    }
}

fn person<R: KvRepository>(store: &mut LedgerStore<R>, action: PersonAction) -> Result<()> {
    match action {
        PersonAction::Add { name } => match store.add_person(&name)? {
            MutationOutcome::Applied => println!("Added {}", name.trim()),
            MutationOutcome::Ignored if name.trim().is_empty() => bail!("person name is required"),
            MutationOutcome::Ignored => println!("{} is already in the ledger", name.trim()),
        },
        PersonAction::Delete { name, yes } => {
            if !store.contains_person(name.trim()) {
                bail!("unknown person `{name}`");
            }
            if !yes && !confirm(&format!("Delete {name} and all their records?"))? {
                println!("Cancelled");
                return Ok(());
            }
            if store.delete_person(&name)?.is_applied() {
                println!("Deleted {name}");
            }
        }
        PersonAction::List => {
            for name in store.people() {
                println!("{name}");
            }
        }
    }
    Ok(())
}

fn txn<R: KvRepository>(store: &mut LedgerStore<R>, action: TxnAction) -> Result<()> {
    let TxnAction::Add {
        person,
        date,
        amount,
        kind,
    } = action;

    // Only people already in the ledger can be selected, like the form dropdown.
    let person = person.trim();
    if !store.contains_person(person) {
        bail!("unknown person `{person}`; add them first with `credeb person add`");
    }
    let amount =
        parse_amount_checked(&amount).with_context(|| format!("invalid amount `{amount}`"))?;

    let kind = TransactionKind::from(kind);
    match store.add_transaction(person, &date, amount, kind)? {
        MutationOutcome::Applied => {
            info!("event=cli_txn_add module=cli status=ok kind={kind}");
            println!("Recorded {} of {amount} for {person}", kind.label());
            Ok(())
        }
        MutationOutcome::Ignored if date.trim().is_empty() => bail!("transaction date is required"),
        MutationOutcome::Ignored => {
            bail!("{amount} would push the {kind} total for {person} past the supported range")
        }
    }
}

fn due<R: KvRepository>(store: &mut LedgerStore<R>, action: DueAction) -> Result<()> {
    match action {
        DueAction::Add {
            creditor,
            date,
            contact,
        } => {
            match store.add_due(&creditor, contact.as_deref(), &date) {
                Ok(()) => println!("Reminder added for {creditor} on {date}"),
                Err(StoreError::Validation(err)) => bail!("{err}"),
                Err(err) => return Err(err).context("failed to add due"),
            }
            Ok(())
        }
        DueAction::List => {
            print!("{}", render::dues_table(dues_rows(store.dues())));
            Ok(())
        }
    }
}

fn export<R: KvRepository>(store: &LedgerStore<R>, out_dir: &Path) -> Result<()> {
    let csv = match transactions_csv(store.transactions()) {
        Ok(csv) => csv,
        Err(ExportError::Empty) => {
            println!("{}", ExportError::Empty);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let path = out_dir.join(export_file_name(store.namespace()));
    std::fs::write(&path, csv).with_context(|| format!("failed to write `{}`", path.display()))?;
    info!(
        "event=export_csv module=cli status=ok rows={}",
        store.transactions().len()
    );
    println!("Exported {}", path.display());
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::txn;
    use crate::cli::{KindArg, TxnAction};
    use credeb_core::{LedgerStore, MemoryKvRepository, Namespace};
    use rust_decimal_macros::dec;

    fn add(person: &str, date: &str, amount: &str) -> TxnAction {
        TxnAction::Add {
            person: person.to_string(),
            date: date.to_string(),
            amount: amount.to_string(),
            kind: KindArg::Credit,
        }
    }

    fn store_with(person: &str) -> LedgerStore<MemoryKvRepository> {
        let mut store = LedgerStore::open(MemoryKvRepository::new(), Namespace::purchase());
        store.add_person(person).unwrap();
        store
    }

    #[test]
    fn txn_add_trims_person_before_membership_check() {
        let mut store = store_with("Alice");
        txn(&mut store, add(" Alice ", "2024-01-01", "5")).unwrap();

        assert_eq!(store.transactions().len(), 1);
        assert_eq!(store.transactions()[0].person, "Alice");
        assert!(txn(&mut store, add("Bob", "2024-01-01", "5")).is_err());
    }

    #[test]
    fn txn_add_explains_rejected_amounts() {
        let mut store = store_with("Alice");

        let err = txn(&mut store, add("Alice", "d", "1e30")).unwrap_err();
        assert!(format!("{err:#}").contains("outside the supported range"));

        txn(&mut store, add("Alice", "d", "50000000000000000000000000000")).unwrap();
        let err = txn(&mut store, add("Alice", "d", "50000000000000000000000000000")).unwrap_err();
        assert!(err.to_string().contains("past the supported range"));
        assert_eq!(store.transactions()[0].amount, dec!(50000000000000000000000000000));
        assert_eq!(store.transactions().len(), 1);
    }
}
