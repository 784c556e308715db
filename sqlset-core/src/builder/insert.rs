//! INSERT and upsert statement generation

use std::collections::HashMap;

use crate::expression::{ExpressionList, ListType};
use crate::render::{render_insert, InsertPayload, Renderer};
use crate::row::{Model, Record, RowSource};
use crate::{Dataset, IntoExpressions, Result, Value};

/// Trait for types that can be converted to INSERT data
pub trait IntoInsertData {
    fn into_insert_data(self) -> InsertPayload;
}

impl IntoInsertData for InsertPayload {
    fn into_insert_data(self) -> InsertPayload {
        self
    }
}

/// No rows at all renders `DEFAULT VALUES`
impl IntoInsertData for () {
    fn into_insert_data(self) -> InsertPayload {
        InsertPayload::Rows(Vec::new())
    }
}

impl IntoInsertData for RowSource {
    fn into_insert_data(self) -> InsertPayload {
        InsertPayload::Rows(vec![self])
    }
}

impl IntoInsertData for Vec<RowSource> {
    fn into_insert_data(self) -> InsertPayload {
        InsertPayload::Rows(self)
    }
}

impl IntoInsertData for Record {
    fn into_insert_data(self) -> InsertPayload {
        InsertPayload::Rows(vec![RowSource::Record(self)])
    }
}

impl IntoInsertData for Vec<Record> {
    fn into_insert_data(self) -> InsertPayload {
        InsertPayload::Rows(self.into_iter().map(RowSource::Record).collect())
    }
}

impl IntoInsertData for HashMap<String, Value> {
    fn into_insert_data(self) -> InsertPayload {
        InsertPayload::Rows(vec![RowSource::from(self)])
    }
}

impl IntoInsertData for Vec<HashMap<String, Value>> {
    fn into_insert_data(self) -> InsertPayload {
        InsertPayload::Rows(self.into_iter().map(RowSource::from).collect())
    }
}

/// A JSON object is one row, a JSON array is one row per element
impl IntoInsertData for serde_json::Value {
    fn into_insert_data(self) -> InsertPayload {
        match self {
            serde_json::Value::Array(items) => {
                InsertPayload::Rows(items.into_iter().map(RowSource::from).collect())
            }
            other => InsertPayload::Rows(vec![RowSource::from(other)]),
        }
    }
}

/// `INSERT INTO ... SELECT ...`
impl IntoInsertData for Dataset {
    fn into_insert_data(self) -> InsertPayload {
        InsertPayload::Select(self)
    }
}

impl IntoInsertData for &Dataset {
    fn into_insert_data(self) -> InsertPayload {
        InsertPayload::Select(self.clone())
    }
}

impl<M: Model> IntoInsertData for &M {
    fn into_insert_data(self) -> InsertPayload {
        InsertPayload::Rows(vec![RowSource::model(self)])
    }
}

impl<M: Model> IntoInsertData for &[M] {
    fn into_insert_data(self) -> InsertPayload {
        InsertPayload::Rows(self.iter().map(RowSource::model).collect())
    }
}

impl<M: Model> IntoInsertData for Vec<&M> {
    fn into_insert_data(self) -> InsertPayload {
        InsertPayload::Rows(self.into_iter().map(RowSource::model).collect())
    }
}

/// What to do when an INSERT hits a unique constraint
#[derive(Debug, Clone)]
pub enum ConflictExpression {
    /// `ON CONFLICT DO NOTHING` (`INSERT IGNORE` on MySQL)
    DoNothing,
    /// `ON CONFLICT (target) DO UPDATE SET ...`
    DoUpdate {
        /// Raw conflict target, e.g. `"id"` or `"ON CONSTRAINT items_pkey"`
        target: String,
        update: RowSource,
        where_: Option<ExpressionList>,
    },
}

impl ConflictExpression {
    pub fn do_nothing() -> Self {
        ConflictExpression::DoNothing
    }

    pub fn do_update(target: impl Into<String>, update: impl Into<RowSource>) -> Self {
        ConflictExpression::DoUpdate {
            target: target.into(),
            update: update.into(),
            where_: None,
        }
    }

    /// Guard the update with a WHERE clause; no effect on `DoNothing`
    pub fn where_(self, conditions: impl IntoExpressions) -> Self {
        match self {
            ConflictExpression::DoNothing => ConflictExpression::DoNothing,
            ConflictExpression::DoUpdate {
                target,
                update,
                where_,
            } => {
                let conditions = conditions.into_expressions();
                let where_ = match where_ {
                    Some(mut list) => {
                        list.append(conditions);
                        Some(list)
                    }
                    None => Some(ExpressionList::new(ListType::And, conditions)),
                };
                ConflictExpression::DoUpdate {
                    target,
                    update,
                    where_,
                }
            }
        }
    }
}

impl Dataset {
    /// Generate an INSERT statement for the given rows or sub-select
    ///
    /// # Examples
    /// ```
    /// use sqlset_core::{from, record};
    ///
    /// let (sql, _) = from("items")
    ///     .to_insert_sql(record! { "name" => "Test1", "address" => "111 Test Addr" })
    ///     .unwrap();
    /// assert_eq!(
    ///     sql,
    ///     r#"INSERT INTO "items" ("address", "name") VALUES ('111 Test Addr', 'Test1')"#
    /// );
    /// ```
    pub fn to_insert_sql(&self, rows: impl IntoInsertData) -> Result<(String, Vec<Value>)> {
        self.insert_sql(rows.into_insert_data(), None)
    }

    /// Generate an INSERT statement with an upsert clause
    pub fn to_insert_conflict_sql(
        &self,
        conflict: ConflictExpression,
        rows: impl IntoInsertData,
    ) -> Result<(String, Vec<Value>)> {
        self.insert_sql(rows.into_insert_data(), Some(&conflict))
    }

    fn insert_sql(
        &self,
        payload: InsertPayload,
        conflict: Option<&ConflictExpression>,
    ) -> Result<(String, Vec<Value>)> {
        let mut r = Renderer::new(self.dialect().as_ref(), self.is_prepared());
        render_insert(&mut r, self.clauses(), &payload, conflict)?;
        let (sql, args) = r.finish();
        tracing::debug!(
            dialect = self.dialect().name(),
            sql = %sql,
            args = args.len(),
            "generated insert sql"
        );
        Ok((sql, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{c, l};
    use crate::row::Field;
    use crate::{dialect, from, record, Error};

    struct Item {
        id: i64,
        name: String,
        address: String,
    }

    impl Model for Item {
        fn fields(&self) -> Vec<Field> {
            vec![
                Field::new("ID", self.id).options("pk,skipinsert"),
                Field::new("Address", self.address.clone()),
                Field::new("Name", self.name.clone()),
            ]
        }
    }

    struct Generated {
        id: i64,
    }

    impl Model for Generated {
        fn fields(&self) -> Vec<Field> {
            vec![Field::new("ID", self.id).options("skipinsert")]
        }
    }

    fn item(name: &str) -> Item {
        Item {
            id: 1,
            name: name.to_string(),
            address: "111 Test Addr".to_string(),
        }
    }

    #[test]
    fn test_insert_record() {
        let (sql, args) = from("items")
            .to_insert_sql(record! { "name" => "Test1", "address" => "111 Test Addr" })
            .unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO "items" ("address", "name") VALUES ('111 Test Addr', 'Test1')"#
        );
        assert!(args.is_empty());
    }

    #[test]
    fn test_insert_multiple_rows() {
        let (sql, _) = from("items")
            .to_insert_sql(vec![record! { "a" => 1, "b" => 2 }, record! { "a" => 3, "b" => 4 }])
            .unwrap();
        assert_eq!(sql, r#"INSERT INTO "items" ("a", "b") VALUES (1, 2), (3, 4)"#);
    }

    #[test]
    fn test_insert_hashmap() {
        let mut data = HashMap::new();
        data.insert("name".to_string(), Value::from("John"));
        data.insert("age".to_string(), Value::from(30));
        let (sql, _) = from("users").to_insert_sql(data).unwrap();
        assert_eq!(sql, r#"INSERT INTO "users" ("age", "name") VALUES (30, 'John')"#);
    }

    #[test]
    fn test_insert_json_rows() {
        let rows = serde_json::json!([{"a": 1}, {"a": 2}]);
        let (sql, _) = from("items").to_insert_sql(rows).unwrap();
        assert_eq!(sql, r#"INSERT INTO "items" ("a") VALUES (1), (2)"#);
    }

    #[test]
    fn test_insert_models() {
        let items = [item("Test1"), item("Test2")];
        let (sql, _) = from("items").to_insert_sql(&items[..]).unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO "items" ("address", "name") VALUES ('111 Test Addr', 'Test1'), ('111 Test Addr', 'Test2')"#
        );
    }

    #[test]
    fn test_insert_default_values() {
        let (sql, _) = from("t").to_insert_sql(&Generated { id: 1 }).unwrap();
        assert_eq!(sql, r#"INSERT INTO "t" DEFAULT VALUES"#);
        let (sql, _) = from("t").to_insert_sql(()).unwrap();
        assert_eq!(sql, r#"INSERT INTO "t" DEFAULT VALUES"#);
    }

    #[test]
    fn test_insert_prepared() {
        let (sql, args) = dialect("postgres")
            .from("items")
            .prepared(true)
            .to_insert_sql(record! { "name" => "Test1", "active" => true, "note" => None::<String> })
            .unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO "items" ("active", "name", "note") VALUES (TRUE, $1, $2)"#
        );
        assert_eq!(args, vec![Value::from("Test1"), Value::Null]);
    }

    #[test]
    fn test_insert_from_select() {
        let source = from("other").select(("a", "b"));
        let (sql, _) = from("items").to_insert_sql(&source).unwrap();
        assert_eq!(sql, r#"INSERT INTO "items" SELECT "a", "b" FROM "other""#);
    }

    #[test]
    fn test_insert_returning() {
        let (sql, _) = from("items")
            .returning("id")
            .to_insert_sql(record! { "name" => "a" })
            .unwrap();
        assert_eq!(sql, r#"INSERT INTO "items" ("name") VALUES ('a') RETURNING "id""#);

        let err = dialect("mysql")
            .from("items")
            .returning("id")
            .to_insert_sql(record! { "name" => "a" })
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedReturning { .. }));
    }

    #[test]
    fn test_insert_without_source() {
        let err = dialect("default")
            .dataset()
            .to_insert_sql(record! { "a" => 1 })
            .unwrap_err();
        assert!(matches!(err, Error::NoSourceDefined { statement: "insert" }));
    }

    #[test]
    fn test_insert_mismatched_rows() {
        let err = from("items")
            .to_insert_sql(vec![record! { "a" => 1, "b" => 2 }, record! { "a" => 1 }])
            .unwrap_err();
        assert!(matches!(err, Error::RowLengthMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn test_upsert_do_nothing() {
        let row = record! { "name" => "Test1" };
        let (sql, _) = from("items")
            .to_insert_conflict_sql(ConflictExpression::do_nothing(), row.clone())
            .unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO "items" ("name") VALUES ('Test1') ON CONFLICT DO NOTHING"#
        );

        let (sql, _) = dialect("mysql")
            .from("items")
            .to_insert_conflict_sql(ConflictExpression::do_nothing(), row)
            .unwrap();
        assert_eq!(sql, "INSERT IGNORE INTO `items` (`name`) VALUES ('Test1')");
    }

    #[test]
    fn test_upsert_do_update() {
        let conflict = ConflictExpression::do_update("key", record! { "updated" => l("NOW()") })
            .where_(c("allow_update").is_true());
        let (sql, _) = from("items")
            .to_insert_conflict_sql(conflict.clone(), record! { "name" => "Test1" })
            .unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO "items" ("name") VALUES ('Test1') ON CONFLICT (key) DO UPDATE SET "updated"=NOW() WHERE ("allow_update" IS TRUE)"#
        );

        let err = dialect("mysql")
            .from("items")
            .to_insert_conflict_sql(conflict, record! { "name" => "Test1" })
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedConflictWhere { .. }));
    }

    #[test]
    fn test_upsert_mysql_duplicate_key() {
        let conflict = ConflictExpression::do_update("key", record! { "updated" => l("NOW()") });
        let (sql, _) = dialect("mysql")
            .from("items")
            .to_insert_conflict_sql(conflict, record! { "name" => "Test1" })
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO `items` (`name`) VALUES ('Test1') ON DUPLICATE KEY UPDATE `updated`=NOW()"
        );
    }

    #[test]
    fn test_upsert_requires_assignments() {
        let conflict = ConflictExpression::do_update("id", Record::new());
        let err = from("items")
            .to_insert_conflict_sql(conflict, record! { "id" => 1 })
            .unwrap_err();
        assert!(matches!(err, Error::NoUpdateValues));
    }
}
