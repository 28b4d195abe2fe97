//! Saved queries
//!
//! - Names and query texts are unique across the whole list
//! - Built-in entries are protected: seeded every start, never deleted
//! - User entries carry `custom-<uuid>` ids and survive restarts

mod errors;
mod query;
mod store;

pub use errors::{SavedQueryError, SavedResult};
pub use query::{SavedQuery, CUSTOM_ID_PREFIX};
pub use store::SavedQueryStore;
