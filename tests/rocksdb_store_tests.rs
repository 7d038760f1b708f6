use flchain::keys;
use flchain::store::RocksStore;
use flchain::traits::StateStore;
use flchain::{ContributionSubmission, Ledger, LedgerOptions, QueryStrategy, RoundStatus, TxClock};
use anyhow::Result;

// ===== Test Helper Functions =====

fn open_store(dir: &tempfile::TempDir) -> Result<RocksStore> {
    RocksStore::open(dir.path().join("state").to_str().unwrap())
}

fn keys_of(entries: &[(String, Vec<u8>)]) -> Vec<&str> {
    entries.iter().map(|(k, _)| k.as_str()).collect()
}

// ===== Unit Tests =====

#[test]
fn test_get_missing_key() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let store = open_store(&temp_dir)?;

    assert!(store.get_state("ROUND_R1")?.is_none());
    Ok(())
}

#[test]
fn test_put_then_get() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let store = open_store(&temp_dir)?;

    store.put_state("ROUND_R1", b"first")?;
    store.put_state("ROUND_R1", b"second")?;

    assert_eq!(store.get_state("ROUND_R1")?, Some(b"second".to_vec()));
    Ok(())
}

#[test]
fn test_contribution_range_bounds() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let store = open_store(&temp_dir)?;

    for key in [
        "CONTRIBUTION_b",
        "CONTRIBUTION_a",
        "CONTRIBUTION_",
        "CONTRIBUTIONS",
        "CONTRIBUTION~",
        "ROUND_R1",
        "CONTRIBUTION_zz",
    ] {
        store.put_state(key, key.as_bytes())?;
    }

    let (start, end) = keys::contribution_range();
    let scanned = store.get_state_by_range(&start, &end)?;
    assert_eq!(
        keys_of(&scanned),
        vec!["CONTRIBUTION_", "CONTRIBUTION_a", "CONTRIBUTION_b", "CONTRIBUTION_zz"]
    );
    assert_eq!(scanned[1].1, b"CONTRIBUTION_a".to_vec());
    Ok(())
}

#[test]
fn test_open_range_scans_everything() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let store = open_store(&temp_dir)?;

    store.put_state("b", b"2")?;
    store.put_state("a", b"1")?;
    store.put_state("c", b"3")?;

    assert_eq!(keys_of(&store.get_state_by_range("", "")?), vec!["a", "b", "c"]);
    assert_eq!(keys_of(&store.get_state_by_range("b", "")?), vec!["b", "c"]);
    assert_eq!(keys_of(&store.get_state_by_range("", "b")?), vec!["a"]);
    Ok(())
}

#[test]
fn test_put_states_batch() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let store = open_store(&temp_dir)?;

    store.put_states(&[])?;

    let entries: Vec<(String, Vec<u8>)> = (0..10)
        .map(|i| (format!("k{:02}", i), vec![i as u8]))
        .collect();
    store.put_states(&entries)?;

    let scanned = store.get_state_by_range("k", "l")?;
    assert_eq!(scanned, entries);
    Ok(())
}

#[test]
fn test_state_survives_reopen() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    {
        let store = open_store(&temp_dir)?;
        let ledger = Ledger::new(&store, TxClock::new(100), LedgerOptions::default());
        ledger.create_training_round("R1")?;
        ledger.record_model_contribution(&ContributionSubmission {
            id: "C1",
            round_id: "R1",
            participant_id: "P1",
            weight_hash: "h1",
            model_uri: "uri1",
            accuracy_json: r#"{"acc":0.9}"#,
            stats_json: r#"{"epochs":"5"}"#,
        })?;
    }

    let store = open_store(&temp_dir)?;
    let ledger = Ledger::with_store(&store);
    let round = ledger.get_training_round("R1")?;
    assert_eq!(round.status, RoundStatus::Created);
    assert_eq!(round.participants, vec!["P1"]);

    let contributions = ledger.get_contributions_by_round("R1")?;
    assert_eq!(contributions.len(), 1);
    assert_eq!(contributions[0].submitted_at, 100);
    Ok(())
}

#[test]
fn test_index_strategy_on_rocksdb() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let store = open_store(&temp_dir)?;
    let options = LedgerOptions {
        query_strategy: QueryStrategy::Index,
        maintain_index: true,
        ..LedgerOptions::default()
    };
    let ledger = Ledger::new(&store, TxClock::new(100), options);

    ledger.create_training_round("R1")?;
    ledger.create_training_round("R2")?;
    for (id, round) in [("C1", "R1"), ("C2", "R2"), ("C3", "R1")] {
        ledger.record_model_contribution(&ContributionSubmission {
            id,
            round_id: round,
            participant_id: "P1",
            weight_hash: "h",
            model_uri: "u",
            accuracy_json: "{}",
            stats_json: "{}",
        })?;
    }

    let ids: Vec<String> = ledger
        .get_contributions_by_round("R1")?
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["C1", "C3"]);
    Ok(())
}
