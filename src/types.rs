use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metric name -> value reported by a participant (e.g. `{"acc": 0.91}`).
pub type AccuracyMetrics = BTreeMap<String, f64>;

/// Free-form training statistics (e.g. `{"epochs": "5"}`).
pub type TrainingStats = BTreeMap<String, String>;

/// Lifecycle state of a training round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    /// Round exists, no training started yet.
    Created,
    /// Participants are training.
    InProgress,
    /// Aggregated model recorded.
    Completed,
}

impl RoundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundStatus::Created => "CREATED",
            RoundStatus::InProgress => "IN_PROGRESS",
            RoundStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One federated-learning training cycle as stored under `ROUND_<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRound {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: RoundStatus,
    /// Participant IDs in first-contribution order. Never contains duplicates.
    #[serde(rename = "Participants", default, deserialize_with = "null_as_default")]
    pub participants: Vec<String>,
    /// Opaque hash of the aggregated weights; empty until finalized.
    #[serde(rename = "ModelWeightHash", default)]
    pub model_weight_hash: String,
    /// Opaque location of the aggregated model; empty until finalized.
    #[serde(rename = "ModelURI", default)]
    pub model_uri: String,
    /// UTC unix timestamp in seconds.
    #[serde(rename = "StartTime", default)]
    pub start_time: i64,
    /// Set iff the round is completed. Encoded as `0` while unset.
    #[serde(rename = "EndTime", default, with = "unix_or_zero")]
    pub end_time: Option<i64>,
}

impl TrainingRound {
    /// A freshly created round: `CREATED`, no participants, no end time.
    pub fn new(id: impl Into<String>, start_time: i64) -> Self {
        Self {
            id: id.into(),
            status: RoundStatus::Created,
            participants: Vec::new(),
            model_weight_hash: String::new(),
            model_uri: String::new(),
            start_time,
            end_time: None,
        }
    }

    pub fn has_participant(&self, participant_id: &str) -> bool {
        self.participants.iter().any(|p| p == participant_id)
    }

    /// Append `participant_id` unless already present.
    ///
    /// Returns true if the participant set changed.
    pub fn add_participant(&mut self, participant_id: &str) -> bool {
        if self.has_participant(participant_id) {
            return false;
        }
        self.participants.push(participant_id.to_string());
        true
    }

    /// Record the aggregated model and close the round.
    pub fn finalize(&mut self, weight_hash: &str, model_uri: &str, end_time: i64) {
        self.model_weight_hash = weight_hash.to_string();
        self.model_uri = model_uri.to_string();
        self.status = RoundStatus::Completed;
        self.end_time = Some(end_time);
    }

    pub fn is_completed(&self) -> bool {
        self.status == RoundStatus::Completed
    }
}

/// A single participant's model update, stored under `CONTRIBUTION_<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelContribution {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "RoundID")]
    pub round_id: String,
    #[serde(rename = "ParticipantID")]
    pub participant_id: String,
    /// UTC unix timestamp in seconds, taken from the ledger clock.
    #[serde(rename = "SubmittedAt")]
    pub submitted_at: i64,
    #[serde(rename = "WeightHash")]
    pub weight_hash: String,
    #[serde(rename = "ModelURI")]
    pub model_uri: String,
    #[serde(rename = "AccuracyMetrics", default, deserialize_with = "null_as_default")]
    pub accuracy_metrics: AccuracyMetrics,
    #[serde(rename = "TrainingStats", default, deserialize_with = "null_as_default")]
    pub training_stats: TrainingStats,
}

/// Treat an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

mod unix_or_zero {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.unwrap_or(0))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<i64>::deserialize(deserializer)?;
        Ok(raw.filter(|ts| *ts != 0))
    }
}
