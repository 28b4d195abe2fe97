//! Query history
//!
//! Bounded log of successful executions, newest first, persisted in the
//! `historyLog` slot.

mod entry;
mod errors;
mod store;

pub use entry::HistoryEntry;
pub use errors::{HistoryError, HistoryResult};
pub use store::{HistoryStore, DEFAULT_MAX_HISTORY};
