//! HTTP adapters for ticket sync.
//!
//! `TrackerClient` pages through the ticketing API's issue search and reads its
//! field catalog. `StoreClient` posts upsert batches to the persistent store.
//! Both implement the ports defined in `ticketsync_core::sync`.

mod client;
mod error;
mod http;
mod store_client;
#[cfg(test)]
mod test_server;
mod types;

pub use client::TrackerClient;
pub use error::{ClientError, Result};
pub use http::DEFAULT_TIMEOUT_SECS;
pub use store_client::StoreClient;
pub use types::*;
