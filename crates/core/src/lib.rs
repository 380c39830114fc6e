//! Core of the ticket sync engine.
//!
//! Pulls issues page by page from a remote ticketing API, resolves field
//! identifiers through the field catalog, and upserts the result into a store
//! in ordered batches. Transports are injected through the traits in [`sync`].

pub mod errors;
pub mod sync;

pub use errors::{Result, SyncError, SyncRetryClass};
