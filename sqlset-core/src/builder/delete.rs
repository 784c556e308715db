//! DELETE and TRUNCATE statement generation

use crate::render::{render_delete, render_truncate, Renderer};
use crate::{Dataset, Result, Value};

/// Identity handling of `TRUNCATE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncateIdentity {
    Restart,
    Continue,
}

/// Options for [`Dataset::to_truncate_with_opts_sql`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TruncateOptions {
    pub identity: Option<TruncateIdentity>,
    /// Takes precedence over `restrict` when both are set
    pub cascade: bool,
    pub restrict: bool,
}

impl Dataset {
    /// Generate a DELETE statement
    pub fn to_delete_sql(&self) -> Result<(String, Vec<Value>)> {
        let mut r = Renderer::new(self.dialect().as_ref(), self.is_prepared());
        render_delete(&mut r, self.clauses())?;
        let (sql, args) = r.finish();
        tracing::debug!(
            dialect = self.dialect().name(),
            sql = %sql,
            args = args.len(),
            "generated delete sql"
        );
        Ok((sql, args))
    }

    /// Generate `TRUNCATE` for the dataset's sources
    pub fn to_truncate_sql(&self) -> Result<(String, Vec<Value>)> {
        self.to_truncate_with_opts_sql(TruncateOptions::default())
    }

    /// Generate `TRUNCATE` with identity and cascade options.
    ///
    /// Truncate never binds arguments, so the prepared flag is ignored.
    pub fn to_truncate_with_opts_sql(&self, opts: TruncateOptions) -> Result<(String, Vec<Value>)> {
        let mut r = Renderer::new(self.dialect().as_ref(), false);
        render_truncate(&mut r, self.clauses(), &opts)?;
        let (sql, args) = r.finish();
        tracing::debug!(dialect = self.dialect().name(), sql = %sql, "generated truncate sql");
        Ok((sql, args))
    }
}
