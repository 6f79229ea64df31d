//! Snapshot persistence over a key-value repository.
//!
//! # Responsibility
//! - Serialize the three ledger collections as JSON under
//!   `<namespace>_people`, `<namespace>_transactions`, `<namespace>_dues`.
//! - Rebuild each collection independently on load, entry by entry.
//!
//! # Invariants
//! - Load never fails: absent, unparsable or unreadable keys become empty
//!   collections.
//! - An entry that cannot be loaded is retained verbatim and written back
//!   on save, so one bad record never erases its neighbours.
//! - Save writes all three keys through one `set_batch` call.

use crate::aggregate::balance::PersonTotals;
use crate::model::ledger::{LedgerSnapshot, RetainedEntries, Transaction};
use crate::model::namespace::Namespace;
use crate::repo::kv_repo::{KvRepository, RepoError, RepoResult};
use log::{debug, error, warn};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Loads the persisted snapshot for `namespace`.
pub fn load_snapshot<R: KvRepository + ?Sized>(repo: &R, namespace: &Namespace) -> LedgerSnapshot {
    let (people, retained_people) = load_collection(repo, &namespace.people_key(), |_| true);

    let mut totals: HashMap<String, PersonTotals> = HashMap::new();
    let (transactions, retained_transactions) =
        load_collection(repo, &namespace.transactions_key(), |txn: &Transaction| {
            if txn.amount <= Decimal::ZERO {
                return false;
            }
            let current = totals.entry(txn.person.clone()).or_default();
            match current.checked_add(txn.kind, txn.amount) {
                Some(next) => {
                    *current = next;
                    true
                }
                None => false,
            }
        });

    let (dues, retained_dues) = load_collection(repo, &namespace.dues_key(), |_| true);

    LedgerSnapshot {
        people,
        transactions,
        dues,
        retained: RetainedEntries {
            people: retained_people,
            transactions: retained_transactions,
            dues: retained_dues,
        },
    }
}

/// Persists every collection of `snapshot` under `namespace`.
pub fn save_snapshot<R: KvRepository + ?Sized>(
    repo: &mut R,
    namespace: &Namespace,
    snapshot: &LedgerSnapshot,
) -> RepoResult<()> {
    let retained = &snapshot.retained;
    let entries = vec![
        encode_entry(namespace.people_key(), &snapshot.people, &retained.people)?,
        encode_entry(
            namespace.transactions_key(),
            &snapshot.transactions,
            &retained.transactions,
        )?,
        encode_entry(namespace.dues_key(), &snapshot.dues, &retained.dues)?,
    ];
    repo.set_batch(&entries)
}

fn encode_entry<T: Serialize>(
    key: String,
    items: &[T],
    retained: &[Value],
) -> RepoResult<(String, Vec<u8>)> {
    let encoded = items
        .iter()
        .map(serde_json::to_value)
        .chain(retained.iter().cloned().map(Ok))
        .collect::<Result<Vec<Value>, _>>()
        .and_then(|values| serde_json::to_vec(&values));
    match encoded {
        Ok(bytes) => Ok((key, bytes)),
        Err(err) => Err(RepoError::Encode {
            key,
            message: err.to_string(),
        }),
    }
}

/// Decodes the array under `key`, splitting it into accepted items and
/// retained raw entries. `accept` sees decoded items in stored order.
fn load_collection<R, T, F>(repo: &R, key: &str, mut accept: F) -> (Vec<T>, Vec<Value>)
where
    R: KvRepository + ?Sized,
    T: DeserializeOwned,
    F: FnMut(&T) -> bool,
{
    let bytes = match repo.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!("event=snapshot_load module=repo status=absent key={key}");
            return (Vec::new(), Vec::new());
        }
        Err(err) => {
            error!(
                "event=snapshot_load module=repo status=error key={key} error_code=read_failed error={err}"
            );
            return (Vec::new(), Vec::new());
        }
    };

    // `null` counts as an absent collection.
    let values = match serde_json::from_slice::<Option<Vec<Value>>>(&bytes) {
        Ok(values) => values.unwrap_or_default(),
        Err(err) => {
            warn!(
                "event=snapshot_load module=repo status=corrupt key={key} bytes={} error={err}",
                bytes.len()
            );
            return (Vec::new(), Vec::new());
        }
    };

    let mut items = Vec::with_capacity(values.len());
    let mut retained = Vec::new();
    for (index, value) in values.into_iter().enumerate() {
        match T::deserialize(&value) {
            Ok(item) if accept(&item) => items.push(item),
            Ok(_) => {
                warn!(
                    "event=snapshot_load module=repo status=retained key={key} index={index} reason=rejected"
                );
                retained.push(value);
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=repo status=retained key={key} index={index} error={err}"
                );
                retained.push(value);
            }
        }
    }
    (items, retained)
}

#[cfg(test)]
mod tests {
    use super::{load_snapshot, save_snapshot};
    use crate::model::ledger::{Due, LedgerSnapshot, Transaction, TransactionKind};
    use crate::model::namespace::Namespace;
    use crate::repo::kv_repo::{KvRepository, MemoryKvRepository};
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};

    fn stored(repo: &MemoryKvRepository, key: &str) -> Value {
        serde_json::from_slice(&repo.get(key).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn empty_repository_loads_empty_snapshot() {
        let repo = MemoryKvRepository::new();
        assert!(load_snapshot(&repo, &Namespace::sales()).is_empty());
    }

    #[test]
    fn collections_recover_independently_from_corruption() {
        let ns = Namespace::purchase();
        let mut repo = MemoryKvRepository::new();
        let snapshot = LedgerSnapshot {
            people: vec!["Alice".to_string()],
            transactions: vec![Transaction::new(
                "Alice",
                "2024-01-01",
                dec!(10),
                TransactionKind::Credit,
            )],
            dues: vec![Due::new("Alice", None, "2024-02-01")],
            ..LedgerSnapshot::default()
        };
        save_snapshot(&mut repo, &ns, &snapshot).unwrap();
        repo.set(&ns.transactions_key(), b"{not json").unwrap();

        let loaded = load_snapshot(&repo, &ns);
        assert_eq!(loaded.people, snapshot.people);
        assert!(loaded.transactions.is_empty());
        assert_eq!(loaded.dues, snapshot.dues);
    }

    #[test]
    fn json_null_loads_as_empty_collection() {
        let ns = Namespace::sales();
        let mut repo = MemoryKvRepository::new();
        repo.set(&ns.people_key(), b"null").unwrap();
        assert!(load_snapshot(&repo, &ns).people.is_empty());
    }

    #[test]
    fn undecodable_entries_are_retained_and_written_back() {
        let ns = Namespace::purchase();
        let mut repo = MemoryKvRepository::new();
        repo.set(
            &ns.transactions_key(),
            br#"[{"name":"A","date":"d1","amount":5,"type":"credit"},
                 {"name":"A","date":"d2","amount":1e30,"type":"credit"},
                 {"name":"B","date":"d3","amount":2,"type":"refund"}]"#,
        )
        .unwrap();

        let mut snapshot = load_snapshot(&repo, &ns);
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.transactions[0].amount, dec!(5));
        assert_eq!(snapshot.retained.transactions.len(), 2);

        snapshot.people.push("B".to_string());
        save_snapshot(&mut repo, &ns, &snapshot).unwrap();

        let written = stored(&repo, &ns.transactions_key());
        assert_eq!(written.as_array().map(Vec::len), Some(3));
        assert_eq!(written[1]["amount"], json!(1e30));
        assert_eq!(written[2]["type"], json!("refund"));
        assert_eq!(load_snapshot(&repo, &ns).retained, snapshot.retained);
    }

    #[test]
    fn entries_overflowing_a_running_total_are_retained() {
        let ns = Namespace::sales();
        let mut repo = MemoryKvRepository::new();
        repo.set(
            &ns.transactions_key(),
            br#"[{"name":"A","date":"d1","amount":"50000000000000000000000000000","type":"credit"},
                 {"name":"A","date":"d2","amount":"50000000000000000000000000000","type":"credit"},
                 {"name":"A","date":"d3","amount":"50000000000000000000000000000","type":"payment"},
                 {"name":"A","date":"d4","amount":"0","type":"payment"}]"#,
        )
        .unwrap();

        let snapshot = load_snapshot(&repo, &ns);
        let dates: Vec<_> = snapshot.transactions.iter().map(|t| t.date.as_str()).collect();
        assert_eq!(dates, vec!["d1", "d3"]);
        assert_eq!(snapshot.retained.transactions.len(), 2);
        assert_eq!(snapshot.retained.transactions[0]["date"], json!("d2"));
    }
}
