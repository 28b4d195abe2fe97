//! Durable key/value store with cross-context change notification
//!
//! # Design
//!
//! - Slots are whole JSON values; last write wins per slot
//! - Each component owns read-modify-write of its own slots
//! - A write is visible to `get` before its change event is published
//! - Text slots round-trip exactly; one layer of foreign quoting is removed
//!   only when the stored text is not valid JSON
//! - Slots changed on disk by another process are published with the
//!   [`EXTERNAL_CONTEXT`] origin

mod backend;
mod bus;
mod codec;
mod errors;
mod local;
mod store;
mod watch;

pub use backend::{KvBackend, MemoryBackend};
pub use codec::{decode_text, strip_one_quote_layer};
pub use errors::{StoreError, StoreResult};
pub use local::FileBackend;
pub use bus::{ChangeBus, ContextId, StorageEvent, Subscription, EXTERNAL_CONTEXT};
pub use store::{DurableStore, StoreKey};
pub use watch::SlotWatcher;
