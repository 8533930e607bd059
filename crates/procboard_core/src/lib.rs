//! Core domain logic for the procboard record-tracking dashboard.
//! This crate is the single source of truth for record lifecycle invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;

pub use config::{AppConfig, ConfigError, ConfigResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{ProcessRecord, RecordStatus, RecordValidationError};
pub use repo::record_repo::{
    RecordRepository, RepoError, RepoResult, SqliteRecordRepository,
};
pub use service::record_service::RecordService;
