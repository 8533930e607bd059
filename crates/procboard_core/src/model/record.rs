//! Process record domain model.
//!
//! # Responsibility
//! - Define the record tracked by the dashboard and its lifecycle helpers.
//! - Validate user-supplied fields before they reach persistence.
//!
//! # Invariants
//! - `closed_at` is `Some` if and only if `status == RecordStatus::Closed`.
//! - `number` and `submitter` are non-empty for every valid record.
//! - `number` is not unique; several records may share one number.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lifecycle state of a process record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Awaiting closure.
    Pending,
    /// Finalized; kept as history until purged.
    Closed,
}

/// Validation failure for a process record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyNumber,
    EmptySubmitter,
    /// `status` and `closed_at` disagree about whether the record is closed.
    ClosedAtMismatch,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNumber => write!(f, "process number must not be empty"),
            Self::EmptySubmitter => write!(f, "submitter name must not be empty"),
            Self::ClosedAtMismatch => {
                write!(f, "closed_at must be set exactly when status is closed")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// A tracked process record.
///
/// Identified by a user-supplied `number`; the same number may appear in
/// multiple records and the last writer wins on mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// User-supplied process identifier.
    pub number: String,
    /// Name of the person who submitted the record.
    pub submitter: String,
    /// Current lifecycle state.
    pub status: RecordStatus,
    /// Submission time, Unix epoch milliseconds.
    pub submitted_at: i64,
    /// Closure time, Unix epoch milliseconds. Set exactly once, on close.
    pub closed_at: Option<i64>,
}

impl ProcessRecord {
    /// Creates a pending record stamped with the given submission time.
    pub fn new(
        number: impl Into<String>,
        submitter: impl Into<String>,
        submitted_at: i64,
    ) -> Self {
        Self {
            number: number.into(),
            submitter: submitter.into(),
            status: RecordStatus::Pending,
            submitted_at,
            closed_at: None,
        }
    }

    /// Transitions this record to `Closed` and stamps the closure time.
    pub fn close(&mut self, closed_at: i64) {
        self.status = RecordStatus::Closed;
        self.closed_at = Some(closed_at);
    }

    pub fn is_pending(&self) -> bool {
        self.status == RecordStatus::Pending
    }

    pub fn is_closed(&self) -> bool {
        self.status == RecordStatus::Closed
    }

    /// Checks field and lifecycle invariants.
    ///
    /// Write paths must call this before persisting; read paths use it to
    /// reject invalid persisted rows instead of masking them.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.number.is_empty() {
            return Err(RecordValidationError::EmptyNumber);
        }
        if self.submitter.is_empty() {
            return Err(RecordValidationError::EmptySubmitter);
        }
        if self.closed_at.is_some() != self.is_closed() {
            return Err(RecordValidationError::ClosedAtMismatch);
        }
        Ok(())
    }
}
