//! Dataset builder module

pub mod clauses;
pub mod common;
pub mod dataset;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

// Re-export types from submodules
pub use clauses::{Clauses, Limit};
pub use common::{IntoColumn, IntoColumns, IntoExpressions, JoinType, NullsPosition, SortDirection};
pub use dataset::Dataset;
pub use delete::{TruncateIdentity, TruncateOptions};
pub use insert::{ConflictExpression, IntoInsertData};
pub use update::IntoUpdateData;
