use procboard_core::db::migrations::latest_version;
use procboard_core::db::open_db_in_memory;
use procboard_core::{
    ProcessRecord, RecordRepository, RecordService, RecordStatus, RepoError,
    SqliteRecordRepository,
};
use rusqlite::Connection;
use std::collections::BTreeSet;

const SUBMITTED_AT: i64 = 1_700_000_000_000;
const CLOSED_AT: i64 = 1_700_000_600_000;

fn record(number: &str, submitter: &str) -> ProcessRecord {
    ProcessRecord::new(number, submitter, SUBMITTED_AT)
}

fn numbers(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[test]
fn create_and_list_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    repo.create_record(&record("123", "Alice")).unwrap();

    let listed = repo.list_records().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].number, "123");
    assert_eq!(listed[0].submitter, "Alice");
    assert_eq!(listed[0].status, RecordStatus::Pending);
    assert_eq!(listed[0].submitted_at, SUBMITTED_AT);
    assert_eq!(listed[0].closed_at, None);
}

#[test]
fn create_with_empty_field_persists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let no_number = repo.create_record(&record("", "Alice")).unwrap_err();
    assert!(matches!(no_number, RepoError::Validation(_)));

    let no_submitter = repo.create_record(&record("123", "")).unwrap_err();
    assert!(matches!(no_submitter, RepoError::Validation(_)));

    assert!(repo.list_records().unwrap().is_empty());
}

#[test]
fn list_preserves_storage_order_and_allows_duplicate_numbers() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    repo.create_record(&record("300", "Carol")).unwrap();
    repo.create_record(&record("100", "Alice")).unwrap();
    repo.create_record(&record("300", "Bob")).unwrap();

    let listed = repo.list_records().unwrap();
    let order: Vec<(&str, &str)> = listed
        .iter()
        .map(|r| (r.number.as_str(), r.submitter.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![("300", "Carol"), ("100", "Alice"), ("300", "Bob")]
    );
}

#[test]
fn close_transitions_only_matching_pending_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    repo.create_record(&record("111", "Alice")).unwrap();
    repo.create_record(&record("222", "Bob")).unwrap();

    let changed = repo
        .close_records(&numbers(&["111", "999"]), CLOSED_AT)
        .unwrap();
    assert_eq!(changed, 1);

    let listed = repo.list_records().unwrap();
    let closed = listed.iter().find(|r| r.number == "111").unwrap();
    assert_eq!(closed.status, RecordStatus::Closed);
    assert_eq!(closed.closed_at, Some(CLOSED_AT));

    let untouched = listed.iter().find(|r| r.number == "222").unwrap();
    assert_eq!(untouched.status, RecordStatus::Pending);
    assert_eq!(untouched.closed_at, None);
}

#[test]
fn close_keeps_original_closure_time_of_already_closed_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    repo.create_record(&record("111", "Alice")).unwrap();
    repo.close_records(&numbers(&["111"]), CLOSED_AT).unwrap();

    let changed = repo
        .close_records(&numbers(&["111"]), CLOSED_AT + 60_000)
        .unwrap();
    assert_eq!(changed, 0);

    let listed = repo.list_records().unwrap();
    assert_eq!(listed[0].closed_at, Some(CLOSED_AT));
}

#[test]
fn close_covers_every_record_sharing_a_number() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    repo.create_record(&record("300", "Alice")).unwrap();
    repo.create_record(&record("300", "Bob")).unwrap();

    let changed = repo.close_records(&numbers(&["300"]), CLOSED_AT).unwrap();
    assert_eq!(changed, 2);
    assert!(repo.list_records().unwrap().iter().all(|r| r.is_closed()));
}

#[test]
fn remove_by_number_deletes_every_status() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    repo.create_record(&record("300", "Alice")).unwrap();
    repo.create_record(&record("300", "Bob")).unwrap();
    repo.create_record(&record("400", "Carol")).unwrap();
    repo.close_records(&numbers(&["300"]), CLOSED_AT).unwrap();

    // "300" now exists both closed (twice) and pending.
    repo.create_record(&record("300", "Dave")).unwrap();

    let removed = repo.remove_by_number("300").unwrap();
    assert_eq!(removed, 3);

    let listed = repo.list_records().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].number, "400");
}

#[test]
fn remove_by_number_without_match_is_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    repo.create_record(&record("100", "Alice")).unwrap();
    assert_eq!(repo.remove_by_number("999").unwrap(), 0);
    assert_eq!(repo.list_records().unwrap().len(), 1);
}

#[test]
fn purge_removes_all_and_only_closed_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    repo.create_record(&record("100", "Alice")).unwrap();
    repo.create_record(&record("200", "Bob")).unwrap();
    repo.create_record(&record("300", "Carol")).unwrap();
    repo.close_records(&numbers(&["100", "300"]), CLOSED_AT)
        .unwrap();

    let purged = repo.purge_closed().unwrap();
    assert_eq!(purged, 2);

    let listed = repo.list_records().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].number, "200");
    assert!(listed[0].is_pending());
}

#[test]
fn service_submit_close_purge_example() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let service = RecordService::new(repo);

    let submitted = service.submit("123", "Alice").unwrap();
    assert!(submitted.is_pending());
    assert_eq!(submitted.closed_at, None);

    let listed = service.list_all().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].number, "123");
    assert_eq!(listed[0].submitter, "Alice");
    assert!(listed[0].is_pending());
    assert!(listed[0].submitted_at > 0);

    assert_eq!(service.close_numbers(&numbers(&["123"])).unwrap(), 1);
    let closed = service.list_all().unwrap();
    assert!(closed[0].is_closed());
    assert!(closed[0].closed_at.is_some());

    assert_eq!(service.purge_closed().unwrap(), 1);
    assert!(service.list_all().unwrap().is_empty());
}

#[test]
fn service_rejects_empty_fields_without_mutation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let service = RecordService::new(repo);

    assert!(matches!(
        service.submit("", "Alice").unwrap_err(),
        RepoError::Validation(_)
    ));
    assert!(matches!(
        service.submit("123", "").unwrap_err(),
        RepoError::Validation(_)
    ));
    assert!(service.list_all().unwrap().is_empty());
}

#[test]
fn service_close_all_pending_leaves_closed_history_alone() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    repo.create_record(&record("100", "Alice")).unwrap();
    repo.close_records(&numbers(&["100"]), CLOSED_AT).unwrap();

    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    service.submit("200", "Bob").unwrap();
    service.submit("300", "Carol").unwrap();

    assert_eq!(service.close_all_pending().unwrap(), 2);
    assert!(service.list_all().unwrap().iter().all(|r| r.is_closed()));

    let history = service.list_all().unwrap();
    let earliest = history.iter().find(|r| r.number == "100").unwrap();
    assert_eq!(earliest.closed_at, Some(CLOSED_AT));

    assert_eq!(service.close_all_pending().unwrap(), 0);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteRecordRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_records_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteRecordRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("processos"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE processos (
            numero TEXT NOT NULL,
            usuario TEXT NOT NULL,
            status TEXT NOT NULL,
            data_envio INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteRecordRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "processos",
            column: "data_fechado"
        })
    ));
}

#[test]
fn list_rejects_invalid_persisted_status() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO processos (numero, usuario, status, data_envio, data_fechado)
         VALUES ('123', 'Alice', 'archived', ?1, NULL);",
        [SUBMITTED_AT],
    )
    .unwrap();

    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    assert!(matches!(
        repo.list_records().unwrap_err(),
        RepoError::InvalidData(_)
    ));
}
