//! Core types for bitgugs.
//!
//! Issue records in the `field: value` format, identifier and file-name
//! generation, and the issue directory store.

pub mod idgen;
pub mod record;
pub mod store;

pub use record::{Field, Record, RecordError};
pub use store::{IssueStore, StoreError};
