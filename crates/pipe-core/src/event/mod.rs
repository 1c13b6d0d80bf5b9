//! Eventos observables del motor incremental.

pub mod store;
pub mod types;

pub use store::{EventStore, InMemoryEventStore};
pub use types::{FullRerunReason, RunEvent, RunEventKind};
