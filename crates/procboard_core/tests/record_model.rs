use procboard_core::{ProcessRecord, RecordStatus, RecordValidationError};

#[test]
fn new_record_starts_pending_without_closure_time() {
    let record = ProcessRecord::new("123", "Alice", 1_700_000_000_000);

    assert_eq!(record.status, RecordStatus::Pending);
    assert_eq!(record.closed_at, None);
    assert!(record.is_pending());
    assert!(!record.is_closed());
    assert!(record.validate().is_ok());
}

#[test]
fn close_sets_status_and_closure_time() {
    let mut record = ProcessRecord::new("123", "Alice", 1_700_000_000_000);
    record.close(1_700_000_600_000);

    assert!(record.is_closed());
    assert_eq!(record.closed_at, Some(1_700_000_600_000));
    assert!(record.validate().is_ok());
}

#[test]
fn validate_rejects_empty_fields() {
    let no_number = ProcessRecord::new("", "Alice", 0);
    assert_eq!(
        no_number.validate(),
        Err(RecordValidationError::EmptyNumber)
    );

    let no_submitter = ProcessRecord::new("123", "", 0);
    assert_eq!(
        no_submitter.validate(),
        Err(RecordValidationError::EmptySubmitter)
    );
}

#[test]
fn validate_rejects_status_closure_time_mismatch() {
    let mut pending_with_time = ProcessRecord::new("123", "Alice", 0);
    pending_with_time.closed_at = Some(1);
    assert_eq!(
        pending_with_time.validate(),
        Err(RecordValidationError::ClosedAtMismatch)
    );

    let mut closed_without_time = ProcessRecord::new("123", "Alice", 0);
    closed_without_time.status = RecordStatus::Closed;
    assert_eq!(
        closed_without_time.validate(),
        Err(RecordValidationError::ClosedAtMismatch)
    );
}

#[test]
fn status_serializes_snake_case() {
    let mut record = ProcessRecord::new("123", "Alice", 1_700_000_000_000);
    record.close(1_700_000_600_000);

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["status"], "closed");
    assert_eq!(value["number"], "123");
    assert_eq!(value["closed_at"], 1_700_000_600_000i64);

    let roundtripped: ProcessRecord = serde_json::from_value(value).unwrap();
    assert_eq!(roundtripped, record);
}
