//! Workspace: the application layer over the core components
//!
//! - Editor text and active tab are persisted per store
//! - Executions always land on the results tab
//! - Saving or deleting a saved query updates history `saved` flags
//! - Errors shown inline raise no transient notice

mod errors;
mod notify;
mod tabs;
#[allow(clippy::module_inception)]
mod workspace;

pub use errors::{WorkspaceError, WorkspaceResult};
pub use self::notify::{Notice, NoticeLevel, NoticeLog, Notifier};
pub use tabs::Tab;
pub use workspace::Workspace;
