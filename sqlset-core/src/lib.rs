//! sqlset core - an immutable, dialect-aware SQL dataset builder
//!
//! A [`Dataset`] describes a SELECT / INSERT / UPDATE / DELETE / TRUNCATE
//! statement. Every builder method returns a new dataset and leaves the
//! receiver untouched; a dialect turns the description into SQL text plus,
//! in prepared mode, the bound arguments.
//!
//! ```
//! use sqlset_core::{c, from};
//!
//! let (sql, args) = from("items")
//!     .where_(c("id").eq(1))
//!     .prepared(true)
//!     .to_sql()
//!     .unwrap();
//! assert_eq!(sql, r#"SELECT * FROM "items" WHERE ("id" = ?)"#);
//! assert_eq!(args.len(), 1);
//! ```

pub mod builder;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod expression;
pub mod operator;
pub mod render;
pub mod row;
pub mod value;

// Re-export main types
pub use builder::{
    ConflictExpression, Dataset, IntoColumn, IntoColumns, IntoExpressions, IntoInsertData,
    IntoUpdateData, JoinType, NullsPosition, SortDirection, TruncateIdentity, TruncateOptions,
};
pub use dialect::{CustomDialect, Dialect, DialectOptions, DialectWrapper};
pub use error::{Error, Result};
pub use executor::{ConnectionPool, ExecutableDataset};
pub use expression::{
    and, avg, c, cast, coalesce, count, default_value, distinct, first, func, i, l, l_with, last,
    max, min, on, or, s, star, sum, t, using, v, Ex, ExOr, Expression, Identifier, IntoExpression,
    Op,
};
pub use operator::{BooleanOperation, CompoundType, RangeOperation};
pub use row::{Field, Model, Record, RowSource, Valuer};
pub use value::Value;

/// Create a dataset selecting from the given sources with the default dialect
pub fn from(sources: impl IntoColumns) -> Dataset {
    Dataset::new(dialect::get_dialect("default")).from(sources)
}

/// Resolve a registered dialect by name, falling back to the default dialect
pub fn dialect(name: &str) -> DialectWrapper {
    DialectWrapper::new(name)
}
