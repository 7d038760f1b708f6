use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use flchain::clock::TxClock;
use flchain::config::QueryStrategy;
use flchain::ledger::{ContributionSubmission, Ledger, LedgerOptions};
use flchain::store::MemoryStore;

const ROUNDS: usize = 50;
const PER_ROUND: usize = 200;

// deterministic ledger with ROUNDS * PER_ROUND contributions
fn populated_store() -> MemoryStore {
    let store = MemoryStore::new();
    let options = LedgerOptions {
        maintain_index: true,
        ..LedgerOptions::default()
    };
    let ledger = Ledger::new(&store, TxClock::new(1_700_000_000), options);

    for r in 0..ROUNDS {
        let round_id = format!("R{:03}", r);
        ledger.create_training_round(&round_id).unwrap();
        for c in 0..PER_ROUND {
            let id = format!("C{:03}-{:04}", r, c);
            let participant = format!("P{:03}", c % 20);
            ledger
                .record_model_contribution(&ContributionSubmission {
                    id: &id,
                    round_id: &round_id,
                    participant_id: &participant,
                    weight_hash: "hash",
                    model_uri: "s3://bucket/model",
                    accuracy_json: r#"{"acc":0.9,"loss":0.1}"#,
                    stats_json: r#"{"epochs":"5"}"#,
                })
                .unwrap();
        }
    }
    store
}

fn bench_contributions_by_round(c: &mut Criterion) {
    let store = populated_store();

    let mut group = c.benchmark_group("contributions_by_round");
    group.sample_size(20);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));

    for strategy in [QueryStrategy::FullScan, QueryStrategy::Index] {
        let options = LedgerOptions {
            query_strategy: strategy,
            maintain_index: true,
            ..LedgerOptions::default()
        };
        let ledger = Ledger::new(&store, TxClock::new(0), options);
        group.bench_function(
            BenchmarkId::new(format!("{:?}", strategy), ROUNDS * PER_ROUND),
            |b| {
                b.iter(|| {
                    let found = ledger.get_contributions_by_round("R025").unwrap();
                    black_box(found);
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_contributions_by_round);
criterion_main!(benches);
