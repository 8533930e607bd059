//! In-memory views over a full record listing.
//!
//! # Responsibility
//! - Split a `list_all` snapshot into pending and closed views.
//! - Build the clipboard-ready text blocks shown next to the tables.
//!
//! # Invariants
//! - Pending views preserve storage order.
//! - Closed views are ordered by closure time, most recent first.
//! - Digest grouping is deterministic (submitters in lexicographic order).

use crate::model::record::ProcessRecord;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Heading of the closed-records digest block.
pub const CLOSED_DIGEST_HEADER: &str = "Closed processes";

/// Returns pending records in storage order.
pub fn pending(records: &[ProcessRecord]) -> Vec<&ProcessRecord> {
    records.iter().filter(|record| record.is_pending()).collect()
}

/// Returns closed records ordered by closure time, most recent first.
///
/// Ties keep storage order (the sort is stable).
pub fn closed_latest_first(records: &[ProcessRecord]) -> Vec<&ProcessRecord> {
    let mut closed: Vec<&ProcessRecord> =
        records.iter().filter(|record| record.is_closed()).collect();
    closed.sort_by_key(|record| Reverse(record.closed_at.unwrap_or(i64::MIN)));
    closed
}

/// Newline-joined pending numbers, ready to paste into a message.
pub fn pending_numbers_block(records: &[ProcessRecord]) -> String {
    pending(records)
        .iter()
        .map(|record| record.number.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Copyable digest of closed records grouped by submitter.
///
/// One block per submitter: a `name:` line followed by that submitter's
/// numbers (most recently closed first) and a blank separator line.
/// Returns an empty string when nothing is closed.
pub fn closed_digest(records: &[ProcessRecord]) -> String {
    let closed = closed_latest_first(records);
    if closed.is_empty() {
        return String::new();
    }

    let mut by_submitter: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in &closed {
        by_submitter
            .entry(record.submitter.as_str())
            .or_default()
            .push(record.number.as_str());
    }

    let mut digest = String::from(CLOSED_DIGEST_HEADER);
    digest.push('\n');
    for (submitter, numbers) in by_submitter {
        digest.push_str(submitter);
        digest.push_str(":\n");
        for number in numbers {
            digest.push_str(number);
            digest.push('\n');
        }
        digest.push('\n');
    }
    digest
}
