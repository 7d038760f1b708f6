use tracing::info;

use super::Ledger;
use crate::error::{LedgerError, LedgerResult};
use crate::keys;
use crate::traits::{Clock, StateStore};
use crate::types::{RoundStatus, TrainingRound};

impl<S: StateStore, C: Clock> Ledger<S, C> {
    /// Load the round stored under `ROUND_<round_id>`.
    pub fn get_training_round(&self, round_id: &str) -> LedgerResult<TrainingRound> {
        self.read_record(&keys::round_key(round_id))?
            .ok_or_else(|| LedgerError::round_not_found(round_id))
    }

    /// Create a round in `CREATED` with no participants and no end time.
    pub fn create_training_round(&self, round_id: &str) -> LedgerResult<TrainingRound> {
        let key = keys::round_key(round_id);
        if self.read_raw(&key)?.is_some() {
            return Err(LedgerError::Conflict {
                kind: "round",
                id: round_id.to_string(),
                reason: "already exists",
            });
        }

        let round = TrainingRound::new(round_id, self.now());
        self.write_record(&key, &round)?;
        info!(round_id, start_time = round.start_time, "training round created");
        Ok(round)
    }

    /// Move a round from `CREATED` to `IN_PROGRESS`.
    pub fn start_training_round(&self, round_id: &str) -> LedgerResult<TrainingRound> {
        let mut round = self.get_training_round(round_id)?;
        if round.status != RoundStatus::Created {
            return Err(LedgerError::InvalidTransition {
                id: round_id.to_string(),
                from: round.status,
                to: RoundStatus::InProgress,
            });
        }

        round.status = RoundStatus::InProgress;
        self.write_record(&keys::round_key(round_id), &round)?;
        info!(round_id, "training round started");
        Ok(round)
    }

    /// Record the aggregated model and mark the round `COMPLETED`.
    ///
    /// Under `ConflictPolicy::Overwrite` a completed round is finalized again
    /// and the later hash, URI and end time replace the earlier ones.
    pub fn record_aggregated_model(
        &self,
        round_id: &str,
        weight_hash: &str,
        model_uri: &str,
    ) -> LedgerResult<TrainingRound> {
        let mut round = self.get_training_round(round_id)?;
        if round.is_completed() && self.rejects_conflicts() {
            return Err(LedgerError::Conflict {
                kind: "round",
                id: round_id.to_string(),
                reason: "is already completed",
            });
        }

        round.finalize(weight_hash, model_uri, self.now());
        self.write_record(&keys::round_key(round_id), &round)?;
        info!(
            round_id,
            weight_hash,
            model_uri,
            participants = round.participants.len(),
            "aggregated model recorded"
        );
        Ok(round)
    }

    /// Every round, in key order.
    pub fn get_all_training_rounds(&self) -> LedgerResult<Vec<TrainingRound>> {
        let (start, end) = keys::round_range();
        self.scan_records(&start, &end)
    }
}
