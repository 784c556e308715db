use std::collections::BTreeMap;

use super::{Dialect, DialectOptions};
use crate::operator::BooleanOperation;

/// MySQL: backtick identifiers, backslash string escapes, no RETURNING
///
/// Conflicts render as `INSERT IGNORE` / `ON DUPLICATE KEY UPDATE`.
#[derive(Debug, Clone)]
pub struct MySqlDialect {
    options: DialectOptions,
}

impl MySqlDialect {
    pub fn new() -> Self {
        let mut boolean_operator_lookup = DialectOptions::default().boolean_operator_lookup;
        boolean_operator_lookup.extend([
            (BooleanOperation::Like, "LIKE BINARY".to_string()),
            (BooleanOperation::NotLike, "NOT LIKE BINARY".to_string()),
            (BooleanOperation::ILike, "LIKE".to_string()),
            (BooleanOperation::NotILike, "NOT LIKE".to_string()),
            (BooleanOperation::RegexpLike, "REGEXP BINARY".to_string()),
            (BooleanOperation::RegexpNotLike, "NOT REGEXP BINARY".to_string()),
            (BooleanOperation::RegexpILike, "REGEXP".to_string()),
            (BooleanOperation::RegexpNotILike, "NOT REGEXP".to_string()),
        ]);

        Self {
            options: DialectOptions {
                supports_returning: false,
                supports_limit_on_update: true,
                supports_order_by_on_update: true,
                supports_limit_on_delete: true,
                supports_order_by_on_delete: true,
                supports_conflict_target: false,
                supports_conflict_update_where: false,
                supports_insert_ignore: true,
                conflict_fragment: " ON DUPLICATE KEY".to_string(),
                conflict_do_update_fragment: " UPDATE ".to_string(),
                quote_char: '`',
                escaped_runes: BTreeMap::from([
                    ('\'', "\\'".to_string()),
                    ('"', "\\\"".to_string()),
                    ('\\', "\\\\".to_string()),
                    ('\n', "\\n".to_string()),
                    ('\r', "\\r".to_string()),
                    ('\0', "\\x00".to_string()),
                    ('\x1a', "\\x1a".to_string()),
                ]),
                boolean_operator_lookup,
                ..DialectOptions::default()
            },
        }
    }
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &str {
        "mysql"
    }

    fn options(&self) -> &DialectOptions {
        &self.options
    }
}
