use thiserror::Error;

use crate::types::RoundStatus;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{kind} {id} does not exist")]
    NotFound { kind: &'static str, id: String },

    #[error("failed to parse {field}: {source}")]
    PayloadParse {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored record at {key} is corrupt: {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record for {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read state at {key}: {reason}")]
    StoreRead { key: String, reason: String },

    #[error("failed to write state at {key}: {reason}")]
    StoreWrite { key: String, reason: String },

    #[error("{kind} {id} {reason}")]
    Conflict {
        kind: &'static str,
        id: String,
        reason: &'static str,
    },

    #[error("round {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: RoundStatus,
        to: RoundStatus,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl LedgerError {
    pub fn round_not_found(id: &str) -> Self {
        LedgerError::NotFound {
            kind: "round",
            id: id.to_string(),
        }
    }

    pub fn contribution_not_found(id: &str) -> Self {
        LedgerError::NotFound {
            kind: "contribution",
            id: id.to_string(),
        }
    }

    pub(crate) fn store_read(key: &str, err: anyhow::Error) -> Self {
        LedgerError::StoreRead {
            key: key.to_string(),
            reason: format!("{:#}", err),
        }
    }

    pub(crate) fn store_write(key: &str, err: anyhow::Error) -> Self {
        LedgerError::StoreWrite {
            key: key.to_string(),
            reason: format!("{:#}", err),
        }
    }

    /// Stable short code, used by the dispatcher in JSON error replies.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::NotFound { .. } => "not_found",
            LedgerError::PayloadParse { .. } => "payload_parse",
            LedgerError::Deserialization { .. } => "deserialization",
            LedgerError::Serialization { .. } => "serialization",
            LedgerError::StoreRead { .. } => "store_read",
            LedgerError::StoreWrite { .. } => "store_write",
            LedgerError::Conflict { .. } => "conflict",
            LedgerError::InvalidTransition { .. } => "invalid_transition",
            LedgerError::InvalidArgument(_) => "invalid_argument",
        }
    }
}
