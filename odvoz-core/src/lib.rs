//! Core types and refresh pipeline for the odvoz waste collection page cache.

/// Domain models, locators, and timing policies.
pub mod model;
/// Bounded polling for asynchronously appearing page elements.
pub mod poll;
/// Traits describing the page-interaction capability.
pub mod ports;
/// Fixed-delay retry executor.
pub mod retry;
/// Background refresh loop.
pub mod scheduler;
/// Orchestrator turning one page session into one snapshot.
pub mod scrape;
/// Shared store for the latest published snapshot.
pub mod store;
/// Page description consumed by the orchestrator.
pub mod target;

#[cfg(test)]
mod testing;

pub use model::*;
pub use poll::*;
pub use ports::*;
pub use retry::*;
pub use scheduler::*;
pub use scrape::*;
pub use store::*;
pub use target::*;
