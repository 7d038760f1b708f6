use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use flchain::clock::{SystemClock, TxClock};
use flchain::config::BaseConfig;
use flchain::contract::{self, Transaction};
use flchain::ledger::Ledger;
use flchain::store::RocksStore;
use flchain::telemetry;
use flchain::traits::Clock;

/// Apply one federated-learning ledger transaction to local state.
#[derive(Debug, Parser)]
#[command(name = "flchain", version, about)]
struct Cli {
    #[command(flatten)]
    config: BaseConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a round in CREATED state.
    CreateRound { round_id: String },
    /// Move a round from CREATED to IN_PROGRESS.
    StartRound { round_id: String },
    /// Record a participant's model contribution.
    RecordContribution {
        round_id: String,
        participant_id: String,
        weight_hash: String,
        model_uri: String,
        /// Contribution ID; a random UUID when omitted.
        #[arg(long)]
        id: Option<String>,
        /// Accuracy metrics as a JSON object of numbers.
        #[arg(long, default_value = "{}")]
        accuracy: String,
        /// Training stats as a JSON object of strings.
        #[arg(long, default_value = "{}")]
        stats: String,
    },
    /// Record the aggregated model and complete the round.
    RecordAggregatedModel {
        round_id: String,
        weight_hash: String,
        model_uri: String,
    },
    /// Show one round.
    GetRound { round_id: String },
    /// List every round.
    ListRounds,
    /// Show one contribution.
    GetContribution { id: String },
    /// List the contributions of a round.
    ContributionsByRound { round_id: String },
    /// Rebuild the per-round contribution index.
    Reindex,
    /// Print the state digest used to compare replicas.
    Digest,
    /// Invoke a ledger function by name with positional arguments.
    Invoke {
        function: String,
        args: Vec<String>,
    },
}

impl Command {
    fn into_transaction(self) -> Result<Transaction> {
        let tx = match self {
            Command::CreateRound { round_id } => Transaction::CreateTrainingRound { round_id },
            Command::StartRound { round_id } => Transaction::StartTrainingRound { round_id },
            Command::RecordContribution {
                round_id,
                participant_id,
                weight_hash,
                model_uri,
                id,
                accuracy,
                stats,
            } => Transaction::RecordModelContribution {
                id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                round_id,
                participant_id,
                weight_hash,
                model_uri,
                accuracy_json: accuracy,
                stats_json: stats,
            },
            Command::RecordAggregatedModel {
                round_id,
                weight_hash,
                model_uri,
            } => Transaction::RecordAggregatedModel {
                round_id,
                weight_hash,
                model_uri,
            },
            Command::GetRound { round_id } => Transaction::GetTrainingRound { round_id },
            Command::ListRounds => Transaction::GetAllTrainingRounds,
            Command::GetContribution { id } => Transaction::GetModelContribution { id },
            Command::ContributionsByRound { round_id } => {
                Transaction::GetContributionsByRound { round_id }
            }
            Command::Reindex => Transaction::Reindex,
            Command::Digest => Transaction::StateDigest,
            Command::Invoke { function, args } => Transaction::from_args(&function, &args)?,
        };
        Ok(tx)
    }
}

fn main() -> Result<()> {
    telemetry::init();

    let cli = Cli::parse();
    let config = cli.config;
    info!(
        "Configuration: storage_path={}, conflict_policy={:?}, query_strategy={:?}",
        config.storage_path, config.conflict_policy, config.query_strategy
    );

    let tx = cli.command.into_transaction()?;

    let store = RocksStore::open(&config.storage_path)?;
    info!("Storage opened at: {}", config.storage_path);

    let clock: Box<dyn Clock> = match config.tx_timestamp {
        Some(ts) => Box::new(TxClock::new(ts)),
        None => Box::new(SystemClock),
    };
    let ledger = Ledger::new(&store, clock, config.ledger_options());

    let response = contract::invoke(&ledger, &tx);
    println!("{}", serde_json::to_string_pretty(&response)?);

    if let Some(err) = response.error {
        bail!("{} failed: {}", response.function, err.message);
    }
    Ok(())
}
