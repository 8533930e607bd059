//! Use-case services over the repository layer.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations the UI dispatches.
//! - Own timestamping so repositories stay deterministic under test.

pub mod record_service;
