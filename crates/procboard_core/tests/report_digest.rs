use procboard_core::report::{
    closed_digest, closed_latest_first, pending, pending_numbers_block,
};
use procboard_core::ProcessRecord;

fn pending_record(number: &str, submitter: &str) -> ProcessRecord {
    ProcessRecord::new(number, submitter, 1_700_000_000_000)
}

fn closed_record(number: &str, submitter: &str, closed_at: i64) -> ProcessRecord {
    let mut record = pending_record(number, submitter);
    record.close(closed_at);
    record
}

#[test]
fn pending_keeps_storage_order() {
    let records = vec![
        pending_record("300", "Carol"),
        closed_record("101", "Alice", 1_000),
        pending_record("100", "Alice"),
    ];

    let view = pending(&records);
    let order: Vec<&str> = view.iter().map(|r| r.number.as_str()).collect();
    assert_eq!(order, vec!["300", "100"]);
}

#[test]
fn closed_view_is_ordered_most_recent_first() {
    let records = vec![
        closed_record("101", "Alice", 1_000),
        closed_record("202", "Bob", 3_000),
        pending_record("404", "Carol"),
        closed_record("303", "Alice", 2_000),
    ];

    let view = closed_latest_first(&records);
    let order: Vec<&str> = view.iter().map(|r| r.number.as_str()).collect();
    assert_eq!(order, vec!["202", "303", "101"]);
}

#[test]
fn closed_view_breaks_ties_by_storage_order() {
    let records = vec![
        closed_record("201", "Bob", 2_000),
        closed_record("102", "Alice", 2_000),
    ];

    let view = closed_latest_first(&records);
    let order: Vec<&str> = view.iter().map(|r| r.number.as_str()).collect();
    assert_eq!(order, vec!["201", "102"]);
}

#[test]
fn pending_block_joins_numbers_with_newlines() {
    let records = vec![
        pending_record("100", "Alice"),
        closed_record("200", "Bob", 1_000),
        pending_record("300", "Carol"),
    ];

    assert_eq!(pending_numbers_block(&records), "100\n300");
    assert_eq!(pending_numbers_block(&[]), "");
}

#[test]
fn digest_groups_by_submitter_most_recent_first() {
    let records = vec![
        closed_record("101", "Alice", 1_000),
        closed_record("202", "Bob", 3_000),
        closed_record("303", "Alice", 2_000),
        pending_record("404", "Carol"),
    ];

    let digest = closed_digest(&records);
    assert_eq!(
        digest,
        "Closed processes\nAlice:\n303\n101\n\nBob:\n202\n\n"
    );
}

#[test]
fn digest_is_empty_without_closed_records() {
    let records = vec![pending_record("100", "Alice")];
    assert_eq!(closed_digest(&records), "");
}
