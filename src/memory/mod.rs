//! Persistent assistant memory: an append-only event log and a task list kept in a
//! single JSON file.

pub mod store;
pub mod types;

pub use store::MemoryStore;
pub use types::{EventRecord, MemoryDocument, TaskRecord};
