//! Dialect-aware SQL rendering
//!
//! [`Renderer`] walks expressions and clause snapshots and writes them into a
//! [`SqlBuffer`], consulting the dialect's [`DialectOptions`] for every
//! keyword, quote and operator.

mod expression;
mod statement;

pub(crate) use statement::{
    render_delete, render_insert, render_select, render_truncate, render_update,
};
pub use statement::InsertPayload;

use crate::dialect::{Dialect, DialectOptions};
use crate::error::Result;
use crate::value::Value;

/// Append-only SQL text plus the positional arguments collected so far
#[derive(Debug, Default)]
pub struct SqlBuffer {
    sql: String,
    args: Vec<Value>,
    prepared: bool,
}

impl SqlBuffer {
    pub fn new(prepared: bool) -> Self {
        Self {
            sql: String::new(),
            args: Vec::new(),
            prepared,
        }
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn write_str(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    pub fn write_char(&mut self, ch: char) {
        self.sql.push(ch);
    }

    /// Record an argument and return its 1-based ordinal
    pub fn push_arg(&mut self, value: Value) -> usize {
        self.args.push(value);
        self.args.len()
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Consume the buffer, yielding the statement and its arguments
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}

/// Writes SQL for one dialect into a buffer
pub struct Renderer<'a> {
    pub dialect: &'a dyn Dialect,
    pub buf: SqlBuffer,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect, prepared: bool) -> Self {
        Self {
            dialect,
            buf: SqlBuffer::new(prepared),
        }
    }

    pub fn options(&self) -> &'a DialectOptions {
        self.dialect.options()
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.buf.write_str(text);
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        self.buf.write_char(ch);
    }

    /// Append a placeholder for the value and record it as an argument
    pub(crate) fn add_param(&mut self, value: Value) {
        let ordinal = self.buf.push_arg(value);
        let placeholder = self.dialect.placeholder(ordinal);
        self.buf.write_str(&placeholder);
    }

    pub fn finish(self) -> (String, Vec<Value>) {
        self.buf.finish()
    }
}

/// Something that can be written as SQL
pub trait Render {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()>;
}

/// Render a standalone expression, e.g. for debugging or for embedding in
/// hand written SQL.
pub fn render_expression<E: Render>(
    dialect: &dyn Dialect,
    expr: &E,
    prepared: bool,
) -> Result<(String, Vec<Value>)> {
    let mut r = Renderer::new(dialect, prepared);
    expr.render(&mut r)?;
    Ok(r.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::PostgresDialect;

    #[test]
    fn test_buffer_ordinals_start_at_one() {
        let mut buf = SqlBuffer::new(true);
        assert_eq!(buf.push_arg(Value::I32(1)), 1);
        assert_eq!(buf.push_arg(Value::I32(2)), 2);
        buf.write_str("SELECT");
        buf.write_char(' ');
        assert_eq!(buf.sql(), "SELECT ");
        let (sql, args) = buf.finish();
        assert_eq!(sql, "SELECT ");
        assert_eq!(args, vec![Value::I32(1), Value::I32(2)]);
    }

    #[test]
    fn test_add_param_uses_dialect_placeholder() {
        let dialect = PostgresDialect::new();
        let mut r = Renderer::new(&dialect, true);
        r.add_param(Value::from("a"));
        r.push(", ");
        r.add_param(Value::from("b"));
        let (sql, args) = r.finish();
        assert_eq!(sql, "$1, $2");
        assert_eq!(args.len(), 2);
    }
}
