use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{encode_record, Ledger};
use crate::error::{LedgerError, LedgerResult};
use crate::keys;
use crate::traits::{Clock, StateStore};
use crate::types::{AccuracyMetrics, ModelContribution, TrainingStats};

/// Arguments of a `RecordModelContribution` invocation.
///
/// The two payloads are raw JSON objects as submitted by the participant.
#[derive(Debug, Clone, Copy)]
pub struct ContributionSubmission<'a> {
    pub id: &'a str,
    pub round_id: &'a str,
    pub participant_id: &'a str,
    pub weight_hash: &'a str,
    pub model_uri: &'a str,
    pub accuracy_json: &'a str,
    pub stats_json: &'a str,
}

impl<S: StateStore, C: Clock> Ledger<S, C> {
    /// Record one participant's model update for an existing round.
    ///
    /// Payloads are parsed before anything is written. The round record is
    /// rewritten only when the participant is new to it; the contribution
    /// record and its index entry are written last, as one batch.
    pub fn record_model_contribution(
        &self,
        submission: &ContributionSubmission<'_>,
    ) -> LedgerResult<ModelContribution> {
        let mut round = self.get_training_round(submission.round_id)?;

        let accuracy_metrics: AccuracyMetrics =
            parse_payload("accuracy metrics", submission.accuracy_json)?;
        let training_stats: TrainingStats =
            parse_payload("training stats", submission.stats_json)?;

        let key = keys::contribution_key(submission.id);
        if self.rejects_conflicts() && self.read_raw(&key)?.is_some() {
            return Err(LedgerError::Conflict {
                kind: "contribution",
                id: submission.id.to_string(),
                reason: "already exists",
            });
        }

        let contribution = ModelContribution {
            id: submission.id.to_string(),
            round_id: submission.round_id.to_string(),
            participant_id: submission.participant_id.to_string(),
            submitted_at: self.now(),
            weight_hash: submission.weight_hash.to_string(),
            model_uri: submission.model_uri.to_string(),
            accuracy_metrics,
            training_stats,
        };
        let contribution_bytes = encode_record(&key, &contribution)?;

        if round.add_participant(submission.participant_id) {
            self.write_record(&keys::round_key(submission.round_id), &round)?;
            debug!(
                round_id = submission.round_id,
                participant_id = submission.participant_id,
                "participant joined round"
            );
        }

        let mut entries = Vec::with_capacity(2);
        if self.options.maintain_index {
            let index_key =
                keys::round_contribution_index_key(submission.round_id, submission.id);
            let index_bytes = encode_record(&index_key, &submission.id)?;
            entries.push((index_key, index_bytes));
        }
        entries.push((key.clone(), contribution_bytes));

        // Index entry and contribution land in one batch.
        self.store
            .put_states(&entries)
            .map_err(|e| LedgerError::store_write(&key, e))?;
        info!(
            contribution_id = submission.id,
            round_id = submission.round_id,
            participant_id = submission.participant_id,
            "model contribution recorded"
        );
        Ok(contribution)
    }

    /// Load the contribution stored under `CONTRIBUTION_<id>`.
    pub fn get_model_contribution(&self, id: &str) -> LedgerResult<ModelContribution> {
        self.read_record(&keys::contribution_key(id))?
            .ok_or_else(|| LedgerError::contribution_not_found(id))
    }
}

/// Parse a JSON object payload; `null` yields an empty mapping.
fn parse_payload<T>(field: &'static str, raw: &str) -> LedgerResult<T>
where
    T: DeserializeOwned + Default,
{
    serde_json::from_str::<Option<T>>(raw)
        .map(Option::unwrap_or_default)
        .map_err(|source| LedgerError::PayloadParse { field, source })
}
