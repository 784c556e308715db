use super::{Dialect, DialectOptions};
use crate::operator::BooleanOperation;

/// SQLite 3: backtick identifiers, no RETURNING and no regexp operators
#[derive(Debug, Clone)]
pub struct SqliteDialect {
    options: DialectOptions,
}

impl SqliteDialect {
    pub fn new() -> Self {
        let mut boolean_operator_lookup = DialectOptions::default().boolean_operator_lookup;
        boolean_operator_lookup.retain(|op, _| {
            !matches!(
                op,
                BooleanOperation::RegexpLike
                    | BooleanOperation::RegexpNotLike
                    | BooleanOperation::RegexpILike
                    | BooleanOperation::RegexpNotILike
            )
        });
        boolean_operator_lookup.insert(BooleanOperation::ILike, "LIKE".to_string());
        boolean_operator_lookup.insert(BooleanOperation::NotILike, "NOT LIKE".to_string());

        Self {
            options: DialectOptions {
                supports_returning: false,
                supports_limit_on_update: true,
                supports_order_by_on_update: true,
                supports_limit_on_delete: true,
                supports_order_by_on_delete: true,
                supports_conflict_update_where: false,
                wrap_compounds_in_parens: false,
                quote_char: '`',
                boolean_operator_lookup,
                ..DialectOptions::default()
            },
        }
    }
}

impl Default for SqliteDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &str {
        "sqlite3"
    }

    fn options(&self) -> &DialectOptions {
        &self.options
    }
}
