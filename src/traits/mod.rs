pub mod clock;
pub mod state_store;

pub use clock::Clock;
pub use state_store::KeyValue;
pub use state_store::StateStore;
