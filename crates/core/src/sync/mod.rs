//! Ticket sync engine: query building, pagination, field metadata and batched delivery.

mod batch_dispatcher;
mod field_resolver;
mod orchestrator;
mod page_fetcher;
mod query_builder;
mod runner;
mod sync_constants;
mod sync_model;
mod sync_traits;

pub use batch_dispatcher::*;
pub use field_resolver::*;
pub use orchestrator::*;
pub use page_fetcher::*;
pub use query_builder::*;
pub use runner::*;
pub use sync_constants::*;
pub use sync_model::*;
pub use sync_traits::*;

#[cfg(test)]
mod test_support;
