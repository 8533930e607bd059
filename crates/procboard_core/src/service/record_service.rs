//! Record use-case service.
//!
//! # Responsibility
//! - Provide the submit/list/close/remove/purge entry points for frontends.
//! - Stamp submission and closure times.
//!
//! # Invariants
//! - Service APIs never bypass repository validation contracts.
//! - Log events carry counts only, never record contents.

use crate::model::record::ProcessRecord;
use crate::repo::record_repo::{RecordRepository, RepoResult};
use log::info;
use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Use-case service wrapper for record operations.
pub struct RecordService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Submits a new pending record stamped with the current time.
    ///
    /// Empty `number` or `submitter` fails validation and nothing is
    /// persisted. Returns the record as stored.
    pub fn submit(
        &self,
        number: impl Into<String>,
        submitter: impl Into<String>,
    ) -> RepoResult<ProcessRecord> {
        let record = ProcessRecord::new(number, submitter, now_epoch_ms());
        self.repo.create_record(&record)?;
        info!("event=record_submit module=service status=ok");
        Ok(record)
    }

    /// Returns all records, unfiltered, in storage order.
    pub fn list_all(&self) -> RepoResult<Vec<ProcessRecord>> {
        self.repo.list_records()
    }

    /// Closes every pending record whose number is in the set.
    ///
    /// Unmatched numbers are a no-op. The closure is not atomic across the
    /// set; a mid-set failure leaves earlier numbers closed.
    pub fn close_numbers(&self, numbers: &BTreeSet<String>) -> RepoResult<usize> {
        let closed = self.repo.close_records(numbers, now_epoch_ms())?;
        info!(
            "event=record_close module=service status=ok requested={} closed={closed}",
            numbers.len()
        );
        Ok(closed)
    }

    /// Closes every record that is currently pending.
    pub fn close_all_pending(&self) -> RepoResult<usize> {
        let numbers: BTreeSet<String> = self
            .repo
            .list_records()?
            .into_iter()
            .filter(ProcessRecord::is_pending)
            .map(|record| record.number)
            .collect();

        if numbers.is_empty() {
            return Ok(0);
        }
        self.close_numbers(&numbers)
    }

    /// Deletes every record with the given number, regardless of status.
    pub fn remove_by_number(&self, number: &str) -> RepoResult<usize> {
        let removed = self.repo.remove_by_number(number)?;
        info!("event=record_remove module=service status=ok removed={removed}");
        Ok(removed)
    }

    /// Deletes all closed records; pending records are untouched.
    pub fn purge_closed(&self) -> RepoResult<usize> {
        let purged = self.repo.purge_closed()?;
        info!("event=record_purge module=service status=ok purged={purged}");
        Ok(purged)
    }
}

fn now_epoch_ms() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as i64,
        Err(_) => 0,
    }
}
