use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::ledger::LedgerOptions;

/// What to do when a write would replace state that is meant to be written once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Silently replace: reused contribution IDs and repeated finalization win.
    #[default]
    Overwrite,
    /// Fail with a conflict error before writing anything.
    Reject,
}

/// How `GetContributionsByRound` finds a round's contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum QueryStrategy {
    /// Scan every contribution record and filter by round.
    #[default]
    FullScan,
    /// Prefix-scan the per-round secondary index.
    Index,
}

/// Base configuration for the ledger binary.
#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct BaseConfig {
    /// Path for persistent state (RocksDB directory).
    #[arg(long, env = "FLCHAIN_STORAGE_PATH", default_value = "./data")]
    pub storage_path: String,

    /// Behaviour on contribution ID reuse and repeated finalization.
    #[arg(long, value_enum, default_value_t = ConflictPolicy::Overwrite)]
    pub conflict_policy: ConflictPolicy,

    /// Query path for contributions of a round.
    #[arg(long, value_enum, default_value_t = QueryStrategy::FullScan)]
    pub query_strategy: QueryStrategy,

    /// Write per-round index entries alongside contributions.
    /// Always on when `query_strategy` is `index`.
    #[arg(long)]
    #[serde(default)]
    pub maintain_index: bool,

    /// Transaction time supplied by the ordering substrate (unix seconds).
    /// When absent, the local wall clock is used.
    #[arg(long)]
    #[serde(default)]
    pub tx_timestamp: Option<i64>,
}

impl BaseConfig {
    pub fn ledger_options(&self) -> LedgerOptions {
        LedgerOptions {
            conflict_policy: self.conflict_policy,
            query_strategy: self.query_strategy,
            maintain_index: self.maintain_index || self.query_strategy == QueryStrategy::Index,
        }
    }
}

impl Default for BaseConfig {
    fn default() -> Self {
        BaseConfig {
            storage_path: "./data".to_string(),
            conflict_policy: ConflictPolicy::default(),
            query_strategy: QueryStrategy::default(),
            maintain_index: false,
            tx_timestamp: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_strategy_forces_index_maintenance() {
        let config = BaseConfig {
            query_strategy: QueryStrategy::Index,
            ..BaseConfig::default()
        };
        assert!(config.ledger_options().maintain_index);
        assert!(!BaseConfig::default().ledger_options().maintain_index);
    }

    #[test]
    fn test_config_from_json() {
        let raw = r#"{
            "storage_path": "/tmp/fl",
            "conflict_policy": "reject",
            "query_strategy": "index"
        }"#;
        let config: BaseConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.conflict_policy, ConflictPolicy::Reject);
        assert_eq!(config.query_strategy, QueryStrategy::Index);
        assert!(!config.maintain_index);
        assert_eq!(config.tx_timestamp, None);
    }
}
