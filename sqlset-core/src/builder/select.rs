//! SELECT statement generation

use crate::render::{render_select, Renderer};
use crate::{Dataset, Result, Value};

impl Dataset {
    /// Generate the SELECT statement
    ///
    /// In prepared mode the argument list holds every bound value in
    /// placeholder order; otherwise it is empty.
    pub fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        let mut r = Renderer::new(self.dialect().as_ref(), self.is_prepared());
        render_select(&mut r, self.clauses())?;
        let (sql, args) = r.finish();
        tracing::debug!(
            dialect = self.dialect().name(),
            sql = %sql,
            args = args.len(),
            "generated select sql"
        );
        Ok((sql, args))
    }
}

#[cfg(test)]
mod tests {
    use crate::expression::*;
    use crate::{dialect, from, Dataset, Error, Value};

    fn sql(ds: &Dataset) -> String {
        ds.to_sql().unwrap().0
    }

    #[test]
    fn test_basic_select() {
        assert_eq!(sql(&from("items")), r#"SELECT * FROM "items""#);
    }

    #[test]
    fn test_select_columns() {
        let query = from("items").select(("id", "name"));
        assert_eq!(sql(&query), r#"SELECT "id", "name" FROM "items""#);

        let query = from("items").select((c("a"), count(star()).as_("total")));
        assert_eq!(sql(&query), r#"SELECT "a", COUNT(*) AS "total" FROM "items""#);
    }

    #[test]
    fn test_select_without_source() {
        let query = dialect("default").dataset().select(l("1"));
        assert_eq!(sql(&query), "SELECT 1");
    }

    #[test]
    fn test_select_distinct() {
        let query = from("items").select_distinct("status");
        assert_eq!(sql(&query), r#"SELECT DISTINCT "status" FROM "items""#);
    }

    #[test]
    fn test_select_with_where() {
        let query = from("items").where_(c("id").eq(1));
        assert_eq!(sql(&query), r#"SELECT * FROM "items" WHERE ("id" = 1)"#);
    }

    #[test]
    fn test_multiple_where_conditions() {
        let query = from("items")
            .where_(c("a").eq(1))
            .where_(c("b").eq(2));
        assert_eq!(
            sql(&query),
            r#"SELECT * FROM "items" WHERE (("a" = 1) AND ("b" = 2))"#
        );
    }

    #[test]
    fn test_empty_conditions_are_dropped() {
        let base = from("items");
        assert_eq!(sql(&base.where_(Ex::new())), r#"SELECT * FROM "items""#);
        assert_eq!(sql(&base.where_(ExOr::new())), r#"SELECT * FROM "items""#);
        assert!(base.where_(Ex::new()).clauses().where_.is_none());
        assert_eq!(sql(&base.having(Ex::new())), r#"SELECT * FROM "items""#);

        let query = base.where_([c("a").eq(1), and(Vec::<Expression>::new())]);
        assert_eq!(sql(&query), r#"SELECT * FROM "items" WHERE ("a" = 1)"#);

        let query = base.where_(or([and(Vec::<Expression>::new()), Ex::new().into_expression()]));
        assert_eq!(sql(&query), r#"SELECT * FROM "items""#);

        let query = base.where_(c("a").eq(1)).where_(Ex::new());
        assert_eq!(sql(&query), r#"SELECT * FROM "items" WHERE ("a" = 1)"#);
    }

    #[test]
    fn test_empty_on_is_a_missing_join_condition() {
        let query = from("a").inner_join("b", on(Ex::new()));
        let err = query.to_sql().unwrap_err();
        assert!(matches!(err, Error::MissingJoinCondition { .. }));
    }

    #[test]
    fn test_or_where() {
        let query = from("items").where_(or([c("a").gt(10), c("b").lt(5)]));
        assert_eq!(
            sql(&query),
            r#"SELECT * FROM "items" WHERE (("a" > 10) OR ("b" < 5))"#
        );
    }

    #[test]
    fn test_limit_and_offset() {
        let query = from("items").limit(10).offset(5);
        assert_eq!(sql(&query), r#"SELECT * FROM "items" LIMIT 10 OFFSET 5"#);
        assert_eq!(sql(&query.limit_all()), r#"SELECT * FROM "items" LIMIT ALL OFFSET 5"#);
        assert_eq!(sql(&query.limit(0).offset(0)), r#"SELECT * FROM "items""#);
    }

    #[test]
    fn test_prepared_limit() {
        let (text, args) = from("items").limit(10).prepared(true).to_sql().unwrap();
        assert_eq!(text, r#"SELECT * FROM "items" LIMIT ?"#);
        assert_eq!(args, vec![Value::U64(10)]);
    }

    #[test]
    fn test_prepared_where() {
        let (text, args) = dialect("postgres")
            .from("items")
            .where_(Ex::new().eq("name", "Bob").op("age", Op::gte(21)))
            .prepared(true)
            .to_sql()
            .unwrap();
        assert_eq!(
            text,
            r#"SELECT * FROM "items" WHERE (("age" >= $1) AND ("name" = $2))"#
        );
        assert_eq!(args, vec![Value::I32(21), Value::from("Bob")]);
    }

    #[test]
    fn test_inner_join() {
        let query = from("items").inner_join("users", on(i("items.user_id").eq(i("users.id"))));
        assert_eq!(
            sql(&query),
            r#"SELECT * FROM "items" INNER JOIN "users" ON ("items"."user_id" = "users"."id")"#
        );
    }

    #[test]
    fn test_join_family() {
        let query = from("a")
            .left_join("b", using("id"))
            .full_outer_join("c", on([c("x").eq(1), c("y").eq(2)]))
            .natural_join("d")
            .cross_join("e");
        assert_eq!(
            sql(&query),
            r#"SELECT * FROM "a" LEFT JOIN "b" USING ("id") FULL OUTER JOIN "c" ON (("x" = 1) AND ("y" = 2)) NATURAL JOIN "d" CROSS JOIN "e""#
        );
    }

    #[test]
    fn test_join_requires_condition() {
        let query = from("a").join(crate::JoinType::Inner, "b", None);
        let err = query.to_sql().unwrap_err();
        assert!(matches!(err, Error::MissingJoinCondition { .. }));
    }

    #[test]
    fn test_order_by() {
        let query = from("items").order([c("name").asc(), c("created").desc().nulls_last()]);
        assert_eq!(
            sql(&query),
            r#"SELECT * FROM "items" ORDER BY "name" ASC, "created" DESC NULLS LAST"#
        );
        let query = query.order_append(c("id").desc());
        assert!(sql(&query).ends_with(r#""id" DESC"#));
        assert_eq!(sql(&query.clear_order()), r#"SELECT * FROM "items""#);
    }

    #[test]
    fn test_group_by_and_having() {
        let query = from("items")
            .select((c("department"), count(star())))
            .group_by("department")
            .having(count(star()).gt(5));
        assert_eq!(
            sql(&query),
            r#"SELECT "department", COUNT(*) FROM "items" GROUP BY "department" HAVING (COUNT(*) > 5)"#
        );
    }

    #[test]
    fn test_subquery_in_where() {
        let sub = from("users").select("id").where_(c("active").is_true());
        let query = from("items").where_(c("user_id").eq(sub));
        assert_eq!(
            sql(&query),
            r#"SELECT * FROM "items" WHERE ("user_id" IN (SELECT "id" FROM "users" WHERE ("active" IS TRUE)))"#
        );
    }

    #[test]
    fn test_from_self() {
        let query = from("items").where_(c("a").gt(1)).from_self().as_("inner");
        assert_eq!(
            sql(&query),
            r#"SELECT * FROM (SELECT * FROM "items" WHERE ("a" > 1)) AS "t1""#
        );
        let outer = from(query);
        assert_eq!(
            sql(&outer),
            r#"SELECT * FROM (SELECT * FROM (SELECT * FROM "items" WHERE ("a" > 1)) AS "t1") AS "inner""#
        );
    }

    #[test]
    fn test_union_wraps_limited_side() {
        let query = from("a").union(&from("b").limit(1));
        assert_eq!(
            sql(&query),
            r#"SELECT * FROM "a" UNION (SELECT * FROM (SELECT * FROM "b" LIMIT 1) AS "t1")"#
        );
    }

    #[test]
    fn test_compounds() {
        let query = from("a")
            .union_all(&from("b"))
            .intersect(&from("c"))
            .order(c("id").asc());
        assert_eq!(
            sql(&query),
            r#"SELECT * FROM "a" UNION ALL (SELECT * FROM "b") INTERSECT (SELECT * FROM "c") ORDER BY "id" ASC"#
        );

        let ordered = from("a").order(c("id").asc()).intersect_all(&from("b"));
        assert_eq!(
            sql(&ordered),
            r#"SELECT * FROM (SELECT * FROM "a" ORDER BY "id" ASC) AS "t1" INTERSECT ALL (SELECT * FROM "b")"#
        );
    }

    #[test]
    fn test_sqlite_compounds_are_bare() {
        let sqlite = dialect("sqlite3");
        let query = sqlite.from("a").union(&sqlite.from("b"));
        assert_eq!(sql(&query), "SELECT * FROM `a` UNION SELECT * FROM `b`");
    }

    #[test]
    fn test_with_dialect() {
        let query = from("items").where_(c("id").eq(1));
        let mysql = query.with_dialect(dialect("mysql").dialect().clone());
        assert_eq!(sql(&mysql), "SELECT * FROM `items` WHERE (`id` = 1)");
        assert_eq!(sql(&query), r#"SELECT * FROM "items" WHERE ("id" = 1)"#);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let query = from("items")
            .where_(Ex::new().eq("b", vec![1, 2]).eq("a", None::<i32>))
            .order(c("a").asc());
        assert_eq!(query.to_sql().unwrap(), query.to_sql().unwrap());
    }
}
