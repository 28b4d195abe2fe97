//! querydeck - a read-only SQL explorer over a bundled sales dataset
//!
//! - Single-flight query execution with schema-aware validation
//! - Durable history, saved queries and editor state with cross-context sync
//! - Derived result views: search, sort, paginate, column widths

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod execution;
pub mod history;
pub mod observability;
pub mod persistence;
pub mod saved;
pub mod validator;
pub mod view;
pub mod workspace;
