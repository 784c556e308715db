//! UPDATE statement generation

use std::collections::HashMap;

use crate::render::{render_update, Renderer};
use crate::row::{Model, Record, RowSource};
use crate::{Dataset, Result, Value};

/// Trait for types that can be converted to UPDATE data
pub trait IntoUpdateData {
    fn into_update_data(self) -> RowSource;
}

impl IntoUpdateData for RowSource {
    fn into_update_data(self) -> RowSource {
        self
    }
}

impl IntoUpdateData for Record {
    fn into_update_data(self) -> RowSource {
        RowSource::Record(self)
    }
}

impl IntoUpdateData for HashMap<String, Value> {
    fn into_update_data(self) -> RowSource {
        RowSource::from(self)
    }
}

impl IntoUpdateData for serde_json::Value {
    fn into_update_data(self) -> RowSource {
        RowSource::from(self)
    }
}

impl<M: Model> IntoUpdateData for &M {
    fn into_update_data(self) -> RowSource {
        RowSource::model(self)
    }
}

impl Dataset {
    /// Generate an UPDATE statement setting the given values
    ///
    /// # Examples
    /// ```
    /// use sqlset_core::{c, from, record};
    ///
    /// let (sql, _) = from("items")
    ///     .where_(c("id").eq(1))
    ///     .to_update_sql(record! { "name" => "Test" })
    ///     .unwrap();
    /// assert_eq!(sql, r#"UPDATE "items" SET "name"='Test' WHERE ("id" = 1)"#);
    /// ```
    pub fn to_update_sql(&self, values: impl IntoUpdateData) -> Result<(String, Vec<Value>)> {
        let row = values.into_update_data();
        let mut r = Renderer::new(self.dialect().as_ref(), self.is_prepared());
        render_update(&mut r, self.clauses(), &row)?;
        let (sql, args) = r.finish();
        tracing::debug!(
            dialect = self.dialect().name(),
            sql = %sql,
            args = args.len(),
            "generated update sql"
        );
        Ok((sql, args))
    }
}
