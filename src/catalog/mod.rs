//! Static catalogs
//!
//! - Schema: ordered column descriptors per table, for display
//! - Dataset: rows per table, for engine registration and validation
//! - Built-in queries: the protected saved-query seed

mod builtin;
mod dataset;
mod schema;

pub use builtin::{builtin_queries, BuiltinQuery};
pub use dataset::{DatasetCatalog, Row};
pub use schema::{ColumnDescriptor, ColumnType, ForeignKeyRef, SchemaCatalog, TableSchema};
