use super::{Dialect, DialectOptions};

/// PostgreSQL: double-quoted identifiers and `$n` placeholders
#[derive(Debug, Clone)]
pub struct PostgresDialect {
    options: DialectOptions,
}

impl PostgresDialect {
    pub fn new() -> Self {
        Self {
            options: DialectOptions {
                placeholder: "$".to_string(),
                include_placeholder_num: true,
                ..DialectOptions::default()
            },
        }
    }
}

impl Default for PostgresDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &str {
        "postgres"
    }

    fn options(&self) -> &DialectOptions {
        &self.options
    }
}
