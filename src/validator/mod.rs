//! Pre-flight query checks
//!
//! # Rules
//!
//! 1. Only statements starting with `SELECT` + whitespace are runnable
//! 2. Queries with a JOIN are passed through unchecked
//! 3. The `FROM` table must exist (case-sensitive)
//! 4. Projected plain columns must exist in the table's sample row
//!
//! The validator never executes anything and has no side effects.

mod errors;
mod statement;
#[allow(clippy::module_inception)]
mod validator;

pub use errors::{ValidationError, ValidationResult};
pub use statement::StatementClass;
pub use validator::QueryValidator;
