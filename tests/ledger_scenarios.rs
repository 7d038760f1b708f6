//! End-to-end scenarios driven through the transaction dispatcher, the way
//! the ordering substrate feeds each replica.

use flchain::contract::{self, Transaction};
use flchain::store::{MemoryStore, RocksStore, StoreVariant};
use flchain::{ConflictPolicy, Ledger, LedgerOptions, StateDigest, TxClock};
use anyhow::Result;

// ==================== TEST HELPERS ====================

fn call(function: &str, args: &[&str]) -> Transaction {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    Transaction::from_args(function, &args).expect("valid transaction")
}

/// An ordered transaction log with the substrate-assigned time of each entry.
fn transaction_log() -> Vec<(i64, Transaction)> {
    vec![
        (1_000, call("CreateTrainingRound", &["R1"])),
        (1_001, call("StartTrainingRound", &["R1"])),
        (
            1_002,
            call(
                "RecordModelContribution",
                &["C1", "R1", "P1", "h1", "uri1", r#"{"acc":0.9}"#, r#"{"epochs":"5"}"#],
            ),
        ),
        (
            1_003,
            call(
                "RecordModelContribution",
                &["C2", "R1", "P2", "h2", "uri2", r#"{"acc":0.8}"#, r#"{"epochs":"3"}"#],
            ),
        ),
        (
            1_004,
            call(
                "RecordModelContribution",
                &["C3", "R1", "P1", "h3", "uri3", r#"{"acc":0.93}"#, r#"{"epochs":"6"}"#],
            ),
        ),
        // Rejected: unknown round.
        (
            1_005,
            call(
                "RecordModelContribution",
                &["C4", "RX", "P3", "h4", "uri4", "{}", "{}"],
            ),
        ),
        (1_006, call("RecordAggregatedModel", &["R1", "agg-hash", "s3://agg/r1"])),
    ]
}

fn apply_log(store: &StoreVariant, options: LedgerOptions) -> Vec<bool> {
    transaction_log()
        .iter()
        .map(|(ts, tx)| {
            let ledger = Ledger::new(store, TxClock::new(*ts), options);
            contract::invoke(&ledger, tx).is_ok()
        })
        .collect()
}

fn digest_of(store: &StoreVariant) -> Result<StateDigest> {
    Ok(Ledger::with_store(store).state_digest()?)
}

// ==================== TESTS ====================

#[test]
fn test_log_outcome_per_transaction() {
    let store = StoreVariant::Memory(MemoryStore::new());
    let outcomes = apply_log(&store, LedgerOptions::default());
    assert_eq!(outcomes, vec![true, true, true, true, true, false, true]);
}

#[test]
fn test_final_state_after_log() -> Result<()> {
    let store = StoreVariant::Memory(MemoryStore::new());
    apply_log(&store, LedgerOptions::default());
    let ledger = Ledger::new(&store, TxClock::new(2_000), LedgerOptions::default());

    let round = contract::execute(&ledger, &call("GetTrainingRound", &["R1"]))?;
    assert_eq!(round["Status"], "COMPLETED");
    assert_eq!(round["Participants"], serde_json::json!(["P1", "P2"]));
    assert_eq!(round["ModelWeightHash"], "agg-hash");
    assert_eq!(round["ModelURI"], "s3://agg/r1");
    assert_eq!(round["StartTime"], 1_000);
    assert_eq!(round["EndTime"], 1_006);

    let contributions = contract::execute(&ledger, &call("GetContributionsByRound", &["R1"]))?;
    let contributions = contributions.as_array().cloned().unwrap_or_default();
    assert_eq!(contributions.len(), 3);
    assert_eq!(contributions[0]["ID"], "C1");
    assert_eq!(contributions[0]["SubmittedAt"], 1_002);
    assert_eq!(contributions[2]["AccuracyMetrics"]["acc"], 0.93);

    let missing = contract::execute(&ledger, &call("GetContributionsByRound", &["RX"]))?;
    assert_eq!(missing, serde_json::json!([]));
    Ok(())
}

#[test]
fn test_replicas_agree_on_memory_and_rocksdb() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let rocks = StoreVariant::Rocks(RocksStore::open(temp_dir.path().to_str().unwrap())?);
    let memory = StoreVariant::Memory(MemoryStore::new());

    apply_log(&rocks, LedgerOptions::default());
    apply_log(&memory, LedgerOptions::default());

    let a = digest_of(&rocks)?;
    let b = digest_of(&memory)?;
    assert_eq!(a, b);
    assert_eq!(a.entries, 4);
    Ok(())
}

#[test]
fn test_strict_replicas_reject_replayed_finalization() -> Result<()> {
    let store = StoreVariant::Memory(MemoryStore::new());
    let options = LedgerOptions {
        conflict_policy: ConflictPolicy::Reject,
        ..LedgerOptions::default()
    };
    apply_log(&store, options);
    let before = digest_of(&store)?;

    let ledger = Ledger::new(&store, TxClock::new(3_000), options);
    let reply = contract::invoke(&ledger, &call("RecordAggregatedModel", &["R1", "other", "uri"]));
    assert_eq!(reply.error.map(|e| e.code), Some("conflict".to_string()));

    let reply = contract::invoke(
        &ledger,
        &call("RecordModelContribution", &["C1", "R1", "P9", "h", "u", "{}", "{}"]),
    );
    assert_eq!(reply.error.map(|e| e.code), Some("conflict".to_string()));

    assert_eq!(digest_of(&store)?, before);
    Ok(())
}

#[test]
fn test_malformed_payload_through_dispatcher() -> Result<()> {
    let store = StoreVariant::Memory(MemoryStore::new());
    let ledger = Ledger::new(&store, TxClock::new(10), LedgerOptions::default());
    contract::execute(&ledger, &call("CreateTrainingRound", &["R1"]))?;
    let before = digest_of(&store)?;

    let reply = contract::invoke(
        &ledger,
        &call("RecordModelContribution", &["C1", "R1", "P1", "h", "u", "not json", "{}"]),
    );
    let error = reply.error.expect("payload must be rejected");
    assert_eq!(error.code, "payload_parse");
    assert!(error.message.contains("accuracy metrics"));

    assert_eq!(digest_of(&store)?, before);
    Ok(())
}
