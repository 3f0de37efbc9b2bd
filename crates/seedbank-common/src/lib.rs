//! Seedbank Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the seedbank workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all seedbank
//! workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Tracing initialization shared by every binary
//! - **Types**: The sequence-record domain types
//! - **FASTA**: Parsing and writing of FASTA payloads
//!
//! # Example
//!
//! ```no_run
//! use seedbank_common::fasta;
//! use seedbank_common::types::Tier;
//!
//! fn collect(payload: &str) -> seedbank_common::Result<usize> {
//!     let records = fasta::parse_records(payload, Tier::Gold)?;
//!     Ok(records.len())
//! }
//! ```

pub mod error;
pub mod fasta;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SeedbankError};
