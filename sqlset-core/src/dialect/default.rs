use super::{Dialect, DialectOptions};

/// ANSI-flavoured dialect used when no dialect is named
#[derive(Debug, Clone, Default)]
pub struct DefaultDialect {
    options: DialectOptions,
}

impl DefaultDialect {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Dialect for DefaultDialect {
    fn name(&self) -> &str {
        "default"
    }

    fn options(&self) -> &DialectOptions {
        &self.options
    }
}
