//! Process-wide dialect registry

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use super::{DefaultDialect, Dialect, MySqlDialect, PostgresDialect, SqliteDialect};
use crate::builder::common::IntoColumns;
use crate::Dataset;

type Registry = RwLock<HashMap<String, Arc<dyn Dialect>>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let builtin: [Arc<dyn Dialect>; 4] = [
            Arc::new(DefaultDialect::new()),
            Arc::new(PostgresDialect::new()),
            Arc::new(MySqlDialect::new()),
            Arc::new(SqliteDialect::new()),
        ];
        let map = builtin
            .into_iter()
            .map(|dialect| (dialect.name().to_string(), dialect))
            .collect();
        RwLock::new(map)
    })
}

/// Register a dialect under a name, replacing any previous registration
pub fn register_dialect(name: impl Into<String>, dialect: Arc<dyn Dialect>) {
    let name = name.into();
    tracing::debug!(dialect = %name, "registering dialect");
    let mut map = registry().write().unwrap_or_else(|poisoned| poisoned.into_inner());
    map.insert(name, dialect);
}

/// Look up a registered dialect
pub fn lookup_dialect(name: &str) -> Option<Arc<dyn Dialect>> {
    let map = registry().read().unwrap_or_else(|poisoned| poisoned.into_inner());
    map.get(name).cloned()
}

/// Look up a registered dialect, falling back to the default dialect
pub fn get_dialect(name: &str) -> Arc<dyn Dialect> {
    match lookup_dialect(name) {
        Some(dialect) => dialect,
        None => {
            tracing::warn!(dialect = %name, "unknown dialect, falling back to default");
            Arc::new(DefaultDialect::new())
        }
    }
}

/// Creates datasets bound to one dialect
///
/// ```
/// let pg = sqlset_core::dialect("postgres");
/// let (sql, _) = pg.from("users").to_sql().unwrap();
/// assert_eq!(sql, r#"SELECT * FROM "users""#);
/// ```
#[derive(Debug, Clone)]
pub struct DialectWrapper {
    dialect: Arc<dyn Dialect>,
}

impl DialectWrapper {
    pub fn new(name: &str) -> Self {
        Self {
            dialect: get_dialect(name),
        }
    }

    pub fn dialect(&self) -> &Arc<dyn Dialect> {
        &self.dialect
    }

    /// Dataset selecting from the given sources
    pub fn from(&self, sources: impl IntoColumns) -> Dataset {
        Dataset::new(self.dialect.clone()).from(sources)
    }

    /// Dataset without sources, e.g. for `SELECT 1`
    pub fn dataset(&self) -> Dataset {
        Dataset::new(self.dialect.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{CustomDialect, DialectOptions};

    #[test]
    fn test_builtin_dialects_registered() {
        for name in ["default", "postgres", "mysql", "sqlite3"] {
            let dialect = lookup_dialect(name).unwrap();
            assert_eq!(dialect.name(), name);
        }
    }

    #[test]
    fn test_unknown_dialect_falls_back_to_default() {
        assert!(lookup_dialect("nope").is_none());
        assert_eq!(get_dialect("nope").name(), "default");
    }

    #[test]
    fn test_register_custom_dialect() {
        let options = DialectOptions {
            quote_char: '[',
            ..DialectOptions::default()
        };
        register_dialect(
            "bracketed",
            Arc::new(CustomDialect::new("bracketed", options)),
        );
        let wrapper = DialectWrapper::new("bracketed");
        assert_eq!(wrapper.dialect().name(), "bracketed");
    }
}
