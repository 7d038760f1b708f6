use tracing::{debug, info, warn};

use super::{decode_record, encode_record, Ledger};
use crate::config::QueryStrategy;
use crate::error::{LedgerError, LedgerResult};
use crate::keys;
use crate::traits::{Clock, StateStore};
use crate::types::ModelContribution;

impl<S: StateStore, C: Clock> Ledger<S, C> {
    /// All contributions recorded for `round_id`, in contribution-key order.
    ///
    /// Returns an empty list when nothing matches, including for rounds that
    /// were never created.
    pub fn get_contributions_by_round(
        &self,
        round_id: &str,
    ) -> LedgerResult<Vec<ModelContribution>> {
        match self.options.query_strategy {
            QueryStrategy::FullScan => self.contributions_by_full_scan(round_id),
            QueryStrategy::Index => self.contributions_by_index(round_id),
        }
    }

    /// Scan `["CONTRIBUTION_", "CONTRIBUTION_~")` and keep the round's records.
    ///
    /// Cost is linear in the number of contributions across all rounds.
    fn contributions_by_full_scan(&self, round_id: &str) -> LedgerResult<Vec<ModelContribution>> {
        let (start, end) = keys::contribution_range();
        let all: Vec<ModelContribution> = self.scan_records(&start, &end)?;
        let scanned = all.len();
        let matched: Vec<ModelContribution> =
            all.into_iter().filter(|c| c.round_id == round_id).collect();
        debug!(round_id, scanned, matched = matched.len(), "contributions full scan");
        Ok(matched)
    }

    fn contributions_by_index(&self, round_id: &str) -> LedgerResult<Vec<ModelContribution>> {
        let (start, end) = keys::round_contribution_index_range(round_id);
        let entries = self
            .store
            .get_state_by_range(&start, &end)
            .map_err(|e| LedgerError::store_read(&start, e))?;

        let mut out = Vec::with_capacity(entries.len());
        for (index_key, value) in &entries {
            let contribution_id: String = decode_record(index_key, value)?;
            let key = keys::contribution_key(&contribution_id);
            match self.read_record::<ModelContribution>(&key)? {
                // A reused contribution ID may since belong to another round.
                Some(contribution) if contribution.round_id == round_id => out.push(contribution),
                Some(_) => {
                    debug!(
                        round_id,
                        contribution_id = %contribution_id,
                        "skipping stale index entry"
                    )
                }
                None => {
                    warn!(
                        round_id,
                        contribution_id = %contribution_id,
                        "index entry without contribution"
                    )
                }
            }
        }
        debug!(round_id, matched = out.len(), "contributions index scan");
        Ok(out)
    }

    /// Rebuild the per-round index from the contribution records.
    ///
    /// Returns the number of index entries written.
    pub fn reindex(&self) -> LedgerResult<usize> {
        let (start, end) = keys::contribution_range();
        let all: Vec<ModelContribution> = self.scan_records(&start, &end)?;

        let mut entries = Vec::with_capacity(all.len());
        for contribution in &all {
            let key = keys::round_contribution_index_key(&contribution.round_id, &contribution.id);
            let value = encode_record(&key, &contribution.id)?;
            entries.push((key, value));
        }

        let (first_key, _) = keys::round_contribution_index_all();
        self.store
            .put_states(&entries)
            .map_err(|e| LedgerError::store_write(&first_key, e))?;
        info!(entries = entries.len(), "round contribution index rebuilt");
        Ok(entries.len())
    }
}
