/// Source of the timestamp stamped onto records by one invocation.
///
/// Every replica re-executes each transaction. A clock that reads the local
/// wall clock (`SystemClock`) makes `SubmittedAt`/`StartTime`/`EndTime`
/// differ between replicas; a substrate-supplied transaction time
/// (`TxClock`) keeps applied state identical everywhere.
pub trait Clock: Send + Sync {
    /// Current time as UTC unix seconds.
    fn now_unix(&self) -> i64;
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now_unix(&self) -> i64 {
        (**self).now_unix()
    }
}
