//! Transaction dispatch.
//!
//! The ordering substrate hands each replica a function name and string
//! arguments. `Transaction::from_args` turns those into a typed call and
//! `invoke` applies it to a `Ledger`, producing a JSON reply.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{ContributionSubmission, Ledger};
use crate::traits::{Clock, StateStore};

/// One ledger invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "function", content = "args")]
pub enum Transaction {
    CreateTrainingRound {
        round_id: String,
    },
    StartTrainingRound {
        round_id: String,
    },
    RecordModelContribution {
        id: String,
        round_id: String,
        participant_id: String,
        weight_hash: String,
        model_uri: String,
        accuracy_json: String,
        stats_json: String,
    },
    RecordAggregatedModel {
        round_id: String,
        weight_hash: String,
        model_uri: String,
    },
    GetTrainingRound {
        round_id: String,
    },
    GetAllTrainingRounds,
    GetModelContribution {
        id: String,
    },
    GetContributionsByRound {
        round_id: String,
    },
    Reindex,
    StateDigest,
}

impl Transaction {
    /// Build a transaction from a function name and positional arguments.
    pub fn from_args(function: &str, args: &[String]) -> LedgerResult<Self> {
        let tx = match function {
            "CreateTrainingRound" => {
                let [round_id] = take_args(function, args)?;
                Transaction::CreateTrainingRound { round_id }
            }
            "StartTrainingRound" => {
                let [round_id] = take_args(function, args)?;
                Transaction::StartTrainingRound { round_id }
            }
            "RecordModelContribution" => {
                let [
                    id,
                    round_id,
                    participant_id,
                    weight_hash,
                    model_uri,
                    accuracy_json,
                    stats_json,
                ] = take_args(function, args)?;
                Transaction::RecordModelContribution {
                    id,
                    round_id,
                    participant_id,
                    weight_hash,
                    model_uri,
                    accuracy_json,
                    stats_json,
                }
            }
            "RecordAggregatedModel" => {
                let [round_id, weight_hash, model_uri] = take_args(function, args)?;
                Transaction::RecordAggregatedModel {
                    round_id,
                    weight_hash,
                    model_uri,
                }
            }
            "GetTrainingRound" => {
                let [round_id] = take_args(function, args)?;
                Transaction::GetTrainingRound { round_id }
            }
            "GetAllTrainingRounds" => {
                let [] = take_args(function, args)?;
                Transaction::GetAllTrainingRounds
            }
            "GetModelContribution" => {
                let [id] = take_args(function, args)?;
                Transaction::GetModelContribution { id }
            }
            "GetContributionsByRound" => {
                let [round_id] = take_args(function, args)?;
                Transaction::GetContributionsByRound { round_id }
            }
            "Reindex" => {
                let [] = take_args(function, args)?;
                Transaction::Reindex
            }
            "StateDigest" => {
                let [] = take_args(function, args)?;
                Transaction::StateDigest
            }
            other => {
                return Err(LedgerError::InvalidArgument(format!(
                    "unknown function {}",
                    other
                )))
            }
        };
        Ok(tx)
    }

    pub fn function_name(&self) -> &'static str {
        match self {
            Transaction::CreateTrainingRound { .. } => "CreateTrainingRound",
            Transaction::StartTrainingRound { .. } => "StartTrainingRound",
            Transaction::RecordModelContribution { .. } => "RecordModelContribution",
            Transaction::RecordAggregatedModel { .. } => "RecordAggregatedModel",
            Transaction::GetTrainingRound { .. } => "GetTrainingRound",
            Transaction::GetAllTrainingRounds => "GetAllTrainingRounds",
            Transaction::GetModelContribution { .. } => "GetModelContribution",
            Transaction::GetContributionsByRound { .. } => "GetContributionsByRound",
            Transaction::Reindex => "Reindex",
            Transaction::StateDigest => "StateDigest",
        }
    }

    /// True if applying the transaction never writes state.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Transaction::GetTrainingRound { .. }
                | Transaction::GetAllTrainingRounds
                | Transaction::GetModelContribution { .. }
                | Transaction::GetContributionsByRound { .. }
                | Transaction::StateDigest
        )
    }
}

fn take_args<const N: usize>(function: &str, args: &[String]) -> LedgerResult<[String; N]> {
    <[String; N]>::try_from(args.to_vec()).map_err(|got| {
        LedgerError::InvalidArgument(format!(
            "{} expects {} argument(s), got {}",
            function,
            N,
            got.len()
        ))
    })
}

/// Error body of a failed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxError {
    pub code: String,
    pub message: String,
}

/// Reply to one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxResponse {
    pub function: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TxError>,
}

impl TxResponse {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Apply `tx` and return its JSON result. Writes return the updated record.
pub fn execute<S: StateStore, C: Clock>(
    ledger: &Ledger<S, C>,
    tx: &Transaction,
) -> LedgerResult<Value> {
    debug!(function = tx.function_name(), "executing transaction");
    match tx {
        Transaction::CreateTrainingRound { round_id } => {
            to_payload(&ledger.create_training_round(round_id)?)
        }
        Transaction::StartTrainingRound { round_id } => {
            to_payload(&ledger.start_training_round(round_id)?)
        }
        Transaction::RecordModelContribution {
            id,
            round_id,
            participant_id,
            weight_hash,
            model_uri,
            accuracy_json,
            stats_json,
        } => {
            let submission = ContributionSubmission {
                id,
                round_id,
                participant_id,
                weight_hash,
                model_uri,
                accuracy_json,
                stats_json,
            };
            to_payload(&ledger.record_model_contribution(&submission)?)
        }
        Transaction::RecordAggregatedModel {
            round_id,
            weight_hash,
            model_uri,
        } => to_payload(&ledger.record_aggregated_model(round_id, weight_hash, model_uri)?),
        Transaction::GetTrainingRound { round_id } => {
            to_payload(&ledger.get_training_round(round_id)?)
        }
        Transaction::GetAllTrainingRounds => to_payload(&ledger.get_all_training_rounds()?),
        Transaction::GetModelContribution { id } => {
            to_payload(&ledger.get_model_contribution(id)?)
        }
        Transaction::GetContributionsByRound { round_id } => {
            to_payload(&ledger.get_contributions_by_round(round_id)?)
        }
        Transaction::Reindex => to_payload(&serde_json::json!({ "entries": ledger.reindex()? })),
        Transaction::StateDigest => to_payload(&ledger.state_digest()?),
    }
}

/// Like `execute`, but folds errors into the reply.
pub fn invoke<S: StateStore, C: Clock>(ledger: &Ledger<S, C>, tx: &Transaction) -> TxResponse {
    let function = tx.function_name().to_string();
    match execute(ledger, tx) {
        Ok(payload) => TxResponse {
            function,
            payload: Some(payload),
            error: None,
        },
        Err(e) => {
            warn!(function = %function, code = e.code(), "transaction failed: {}", e);
            TxResponse {
                function,
                payload: None,
                error: Some(TxError {
                    code: e.code().to_string(),
                    message: e.to_string(),
                }),
            }
        }
    }
}

fn to_payload<T: Serialize>(value: &T) -> LedgerResult<Value> {
    serde_json::to_value(value).map_err(|source| LedgerError::Serialization {
        key: "response".to_string(),
        source,
    })
}
