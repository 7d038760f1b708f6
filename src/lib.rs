// Library exports for the binary, tests and embedding replicas

pub mod clock;
pub mod config;
pub mod contract;
pub mod error;
pub mod keys;
pub mod ledger;
pub mod store;
pub mod telemetry;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use clock::{SystemClock, TxClock};
pub use config::{BaseConfig, ConflictPolicy, QueryStrategy};
pub use contract::{Transaction, TxResponse};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{ContributionSubmission, Ledger, LedgerOptions, StateDigest};
pub use store::{MemoryStore, RocksStore, StoreVariant};
pub use traits::{Clock, StateStore};
pub use types::{ModelContribution, RoundStatus, TrainingRound};
