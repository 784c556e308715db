use chrono::{DateTime, Timelike, Utc};

use super::statement::render_select;
use super::{Render, Renderer};
use crate::builder::common::{NullsPosition, SortDirection};
use crate::error::{Error, Result};
use crate::expression::{
    AliasedExpression, BooleanExpression, CastExpression, ColumnList, CompoundExpression,
    Expression, ExpressionList, FunctionExpression, Identifier, IdentifierColumn, JoinCondition,
    JoinExpression, ListType, Literal, OrderedExpression, RangeExpression, UpdateExpression,
};
use crate::operator::BooleanOperation;
use crate::value::Value;
use crate::Dataset;

impl Render for Expression {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        match self {
            Expression::Identifier(ident) => ident.render(r),
            Expression::Literal(lit) => lit.render(r),
            Expression::Boolean(expr) => expr.render(r),
            Expression::Range(expr) => expr.render(r),
            Expression::List(list) => list.render(r),
            Expression::Ordered(expr) => expr.render(r),
            Expression::Function(func) => func.render(r),
            Expression::Cast(expr) => expr.render(r),
            Expression::Columns(cols) => cols.render(r),
            Expression::Aliased(expr) => expr.render(r),
            Expression::Join(join) => join.render(r),
            Expression::Compound(compound) => compound.render(r),
            Expression::Update(update) => update.render(r),
            Expression::Value(value) => value.render(r),
            Expression::Dataset(dataset) => dataset.render(r),
        }
    }
}

impl Render for Identifier {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        let mut wrote = false;
        for segment in [&self.schema, &self.table].into_iter().flatten() {
            if wrote {
                r.push_char('.');
            }
            let quoted = r.dialect.quote_identifier(segment);
            r.push(&quoted);
            wrote = true;
        }
        if let Some(column) = &self.column {
            if wrote {
                r.push_char('.');
            }
            match column {
                IdentifierColumn::Name(name) => {
                    let quoted = r.dialect.quote_identifier(name);
                    r.push(&quoted);
                }
                IdentifierColumn::Literal(lit) => lit.render(r)?,
            }
        }
        Ok(())
    }
}

impl Render for Literal {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        let mut args = self.args.iter();
        for ch in self.sql.chars() {
            if ch == '?' {
                if let Some(arg) = args.next() {
                    arg.render(r)?;
                    continue;
                }
            }
            r.push_char(ch);
        }
        Ok(())
    }
}

impl Render for BooleanExpression {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        let rewrite = match &self.rhs {
            Expression::Value(Value::Null | Value::Bool(_)) => Some(BooleanOperation::Is),
            Expression::Value(Value::Array(_)) | Expression::Dataset(_) => {
                Some(BooleanOperation::In)
            }
            _ => None,
        };
        let op = match (rewrite, self.op) {
            (Some(positive), BooleanOperation::Eq) => positive,
            (Some(positive), BooleanOperation::Neq) => positive.invert(),
            (_, op) => op,
        };

        let options = r.options();
        let operator = options
            .boolean_operator_lookup
            .get(&op)
            .ok_or_else(|| Error::unsupported_operator(op.as_str(), r.dialect.name()))?;

        r.push_char('(');
        self.lhs.render(r)?;
        r.push_char(' ');
        r.push(operator);
        r.push_char(' ');
        match (op, &self.rhs) {
            // IS NULL is never parameterized
            (BooleanOperation::Is | BooleanOperation::IsNot, Expression::Value(Value::Null)) => {
                r.push(&options.null_literal)
            }
            (_, rhs) => rhs.render(r)?,
        }
        r.push_char(')');
        Ok(())
    }
}

impl Render for RangeExpression {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        let options = r.options();
        let operator = options
            .range_operator_lookup
            .get(&self.op)
            .ok_or_else(|| Error::unsupported_operator(self.op.as_str(), r.dialect.name()))?;

        r.push_char('(');
        self.lhs.render(r)?;
        r.push_char(' ');
        r.push(operator);
        r.push_char(' ');
        self.start.render(r)?;
        r.push(&options.and_fragment);
        self.end.render(r)?;
        r.push_char(')');
        Ok(())
    }
}

impl Render for ExpressionList {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        match self.items.as_slice() {
            [] => Ok(()),
            [single] => single.render(r),
            items => {
                let options = r.options();
                let separator = match self.kind {
                    ListType::And => &options.and_fragment,
                    ListType::Or => &options.or_fragment,
                };
                r.push_char('(');
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        r.push(separator);
                    }
                    item.render(r)?;
                }
                r.push_char(')');
                Ok(())
            }
        }
    }
}

impl Render for OrderedExpression {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        let options = r.options();
        self.expr.render(r)?;
        match self.direction {
            SortDirection::Asc => r.push(&options.asc_fragment),
            SortDirection::Desc => r.push(&options.desc_fragment),
        }
        match self.nulls {
            NullsPosition::Unspecified => {}
            NullsPosition::First => r.push(&options.nulls_first_fragment),
            NullsPosition::Last => r.push(&options.nulls_last_fragment),
        }
        Ok(())
    }
}

impl Render for FunctionExpression {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        r.push(&self.name);
        r.push_char('(');
        render_comma_separated(r, &self.args)?;
        r.push_char(')');
        Ok(())
    }
}

impl Render for CastExpression {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        let options = r.options();
        r.push(&options.cast_fragment);
        r.push_char('(');
        self.expr.render(r)?;
        r.push(&options.as_fragment);
        r.push(&self.target);
        r.push_char(')');
        Ok(())
    }
}

impl Render for ColumnList {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        if self.items.is_empty() {
            let star = &r.options().star;
            r.push(star);
            return Ok(());
        }
        render_comma_separated(r, &self.items)
    }
}

impl Render for AliasedExpression {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        self.inner.render(r)?;
        r.push(&r.options().as_fragment);
        self.alias.render(r)
    }
}

impl Render for JoinExpression {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        let options = r.options();
        match options.join_type_lookup.get(&self.join_type) {
            Some(keyword) => r.push(keyword),
            None => r.push(&format!(" {} ", self.join_type)),
        }
        self.table.render(r)?;

        if !self.join_type.is_conditioned() {
            return Ok(());
        }
        match &self.condition {
            None => Err(Error::MissingJoinCondition {
                join: self.join_type.to_string(),
            }),
            Some(JoinCondition::On(conditions)) if conditions.is_empty() => {
                Err(Error::MissingJoinCondition {
                    join: self.join_type.to_string(),
                })
            }
            Some(JoinCondition::On(conditions)) => {
                r.push_char(' ');
                r.push(&options.on_fragment);
                conditions.render(r)
            }
            Some(JoinCondition::Using(columns)) => {
                r.push_char(' ');
                r.push(&options.using_fragment);
                r.push_char('(');
                columns.render(r)?;
                r.push_char(')');
                Ok(())
            }
        }
    }
}

impl Render for CompoundExpression {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        let options = r.options();
        match options.compound_lookup.get(&self.kind) {
            Some(keyword) => r.push(keyword),
            None => r.push(&format!(" {} ", self.kind)),
        }
        if options.wrap_compounds_in_parens {
            r.push_char('(');
            render_select(r, self.rhs.clauses())?;
            r.push_char(')');
        } else {
            render_select(r, self.rhs.clauses())?;
        }
        Ok(())
    }
}

impl Render for UpdateExpression {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        self.column.render(r)?;
        r.push(&r.options().set_operator);
        self.value.render(r)
    }
}

/// Nested statements render as a parenthesized subquery plus their alias
impl Render for Dataset {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        r.push_char('(');
        render_select(r, self.clauses())?;
        r.push_char(')');
        if let Some(alias) = &self.clauses().alias {
            r.push(&r.options().as_fragment);
            alias.render(r)?;
        }
        Ok(())
    }
}

impl Render for Value {
    fn render(&self, r: &mut Renderer<'_>) -> Result<()> {
        let options = r.options();
        let prepared = r.buf.is_prepared();
        match self {
            Value::Bool(true) => r.push(&options.true_literal),
            Value::Bool(false) => r.push(&options.false_literal),
            Value::Array(items) => {
                r.push_char('(');
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        r.push(", ");
                    }
                    item.render(r)?;
                }
                r.push_char(')');
            }
            value if prepared => r.add_param(value.clone()),
            Value::Null => r.push(&options.null_literal),
            Value::I32(n) => r.push(&n.to_string()),
            Value::I64(n) => r.push(&n.to_string()),
            Value::U64(n) => r.push(&n.to_string()),
            Value::F32(n) => {
                if !n.is_finite() {
                    return Err(Error::unsupported_value(n.to_string()));
                }
                r.push(&n.to_string());
            }
            Value::F64(n) => {
                if !n.is_finite() {
                    return Err(Error::unsupported_value(n.to_string()));
                }
                r.push(&n.to_string());
            }
            Value::String(s) => render_string(r, s),
            Value::Bytes(bytes) => render_string(r, &String::from_utf8_lossy(bytes)),
            Value::Json(json) => render_string(r, &json.to_string()),
            Value::Timestamp(ts) => render_string(r, &format_timestamp(ts)),
            #[cfg(feature = "uuid-support")]
            Value::Uuid(uuid) => render_string(r, &uuid.to_string()),
            #[cfg(feature = "decimal-support")]
            Value::Decimal(d) => r.push(&d.to_string()),
        }
        Ok(())
    }
}

fn render_comma_separated(r: &mut Renderer<'_>, items: &[Expression]) -> Result<()> {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            r.push(", ");
        }
        item.render(r)?;
    }
    Ok(())
}

fn render_string(r: &mut Renderer<'_>, text: &str) {
    let options = r.options();
    r.push_char(options.string_quote);
    for ch in text.chars() {
        match options.escaped_runes.get(&ch) {
            Some(escaped) => r.push(escaped),
            None => r.push_char(ch),
        }
    }
    r.push_char(options.string_quote);
}

/// RFC 3339 in UTC with trailing zeros of the fraction trimmed
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    let mut text = ts.format("%Y-%m-%dT%H:%M:%S").to_string();
    let nanos = ts.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{:09}", nanos);
        text.push('.');
        text.push_str(fraction.trim_end_matches('0'));
    }
    text.push('Z');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{DefaultDialect, Dialect, MySqlDialect, PostgresDialect, SqliteDialect};
    use crate::expression::*;
    use crate::render::render_expression;
    use chrono::TimeZone;

    fn sql(expr: Expression) -> String {
        render_expression(&DefaultDialect::new(), &expr, false).unwrap().0
    }

    fn sql_with(dialect: &dyn Dialect, expr: Expression) -> String {
        render_expression(dialect, &expr, false).unwrap().0
    }

    fn prepared(dialect: &dyn Dialect, expr: Expression) -> (String, Vec<Value>) {
        render_expression(dialect, &expr, true).unwrap()
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(sql(c("name")), r#""name""#);
        assert_eq!(sql(i("public.users.id")), r#""public"."users"."id""#);
        assert_eq!(sql(i("users.*")), r#""users".*"#);
        assert_eq!(sql(t("users")), r#""users""#);
        assert_eq!(sql(c("we\"ird")), r#""we""ird""#);
        assert_eq!(sql_with(&MySqlDialect::new(), i("a.b")), "`a`.`b`");
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(sql(c("a").eq(1)), r#"("a" = 1)"#);
        assert_eq!(sql(c("a").neq("x")), r#"("a" != 'x')"#);
        assert_eq!(sql(c("a").gte(1.5)), r#"("a" >= 1.5)"#);
        assert_eq!(sql(c("a").like("a%")), r#"("a" LIKE 'a%')"#);
        assert_eq!(sql(c("a").eq(c("b"))), r#"("a" = "b")"#);
    }

    #[test]
    fn test_null_and_bool_rewrites() {
        assert_eq!(sql(c("a").eq(None::<i32>)), r#"("a" IS NULL)"#);
        assert_eq!(sql(c("a").neq(Value::Null)), r#"("a" IS NOT NULL)"#);
        assert_eq!(sql(c("a").eq(true)), r#"("a" IS TRUE)"#);
        assert_eq!(sql(c("a").neq(false)), r#"("a" IS NOT FALSE)"#);
        assert_eq!(sql(c("a").is_null()), r#"("a" IS NULL)"#);
        assert_eq!(sql(c("a").is_not_true()), r#"("a" IS NOT TRUE)"#);
    }

    #[test]
    fn test_in_rewrites() {
        assert_eq!(sql(c("a").eq(vec![1, 2, 3])), r#"("a" IN (1, 2, 3))"#);
        assert_eq!(sql(c("a").neq(vec!["x", "y"])), r#"("a" NOT IN ('x', 'y'))"#);
        assert_eq!(sql(c("a").in_(vec![1])), r#"("a" IN (1))"#);
    }

    #[test]
    fn test_prepared_null_and_bool_asymmetry() {
        let dialect = DefaultDialect::new();
        let (text, args) = prepared(&dialect, c("a").is_null());
        assert_eq!(text, r#"("a" IS NULL)"#);
        assert!(args.is_empty());

        let (text, args) = prepared(&dialect, c("a").eq(true));
        assert_eq!(text, r#"("a" IS TRUE)"#);
        assert!(args.is_empty());

        // a bare NULL outside IS is still bound
        let (text, args) = prepared(&dialect, func("COALESCE", vec![c("a"), v(Value::Null)]));
        assert_eq!(text, r#"COALESCE("a", ?)"#);
        assert_eq!(args, vec![Value::Null]);
    }

    #[test]
    fn test_prepared_postgres_ordinals() {
        let (text, args) = prepared(
            &PostgresDialect::new(),
            and([c("a").eq(1), c("b").in_(vec!["x", "y"])]),
        );
        assert_eq!(text, r#"(("a" = $1) AND ("b" IN ($2, $3)))"#);
        assert_eq!(
            args,
            vec![
                Value::I32(1),
                Value::String("x".to_string()),
                Value::String("y".to_string())
            ]
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(sql(and([c("a").eq(1)])), r#"("a" = 1)"#);
        assert_eq!(
            sql(or([c("a").eq(1), c("b").eq(2)])),
            r#"(("a" = 1) OR ("b" = 2))"#
        );
        assert_eq!(
            sql(and([c("a").eq(1), or([c("b").eq(2), c("c").eq(3)])])),
            r#"(("a" = 1) AND (("b" = 2) OR ("c" = 3)))"#
        );
        assert_eq!(sql(and(Vec::<Expression>::new())), "");
    }

    #[test]
    fn test_ex_maps() {
        assert_eq!(
            sql(Ex::new().eq("b", "x").eq("a", 1).into_expression()),
            r#"(("a" = 1) AND ("b" = 'x'))"#
        );
        assert_eq!(
            sql(ExOr::new()
                .op("a", Op::gt(1))
                .op("b", Op::between(1, 5))
                .into_expression()),
            r#"(("a" > 1) OR ("b" BETWEEN 1 AND 5))"#
        );
        assert_eq!(
            sql(Ex::new().eq("a", None::<i32>).into_expression()),
            r#"("a" IS NULL)"#
        );
    }

    #[test]
    fn test_ranges() {
        assert_eq!(sql(c("a").between(1, 10)), r#"("a" BETWEEN 1 AND 10)"#);
        assert_eq!(
            sql(c("a").not_between("a", "z")),
            r#"("a" NOT BETWEEN 'a' AND 'z')"#
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(sql(l("NOW()")), "NOW()");
        assert_eq!(sql(l_with("? + ?", vec![v(1), c("a")])), r#"1 + "a""#);
        assert_eq!(sql(l_with("a = ? OR b = ?", vec![v(1)])), "a = 1 OR b = ?");
        assert_eq!(sql(star()), "*");
    }

    #[test]
    fn test_strings_are_escaped() {
        assert_eq!(sql(v("it's")), "'it''s'");
        assert_eq!(
            sql_with(&MySqlDialect::new(), v("it's \"q\" \\ \n")),
            r#"'it\'s \"q\" \\ \n'"#
        );
        assert_eq!(sql(v(b"abc".to_vec())), "'abc'");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(sql(v(1.0f64)), "1");
        assert_eq!(sql(v(-2.25f32)), "-2.25");
        assert_eq!(sql(v(u64::MAX)), "18446744073709551615");
        let err = render_expression(&DefaultDialect::new(), &v(f64::NAN), false).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValueType { .. }));
    }

    #[test]
    fn test_timestamps() {
        let ts = Utc.with_ymd_and_hms(2019, 10, 1, 15, 1, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        assert_eq!(sql(v(ts)), "'2019-10-01T15:01:00.123456789Z'");

        let ts = Utc.with_ymd_and_hms(2019, 10, 1, 15, 1, 0).unwrap()
            + chrono::Duration::milliseconds(500);
        assert_eq!(sql(v(ts)), "'2019-10-01T15:01:00.5Z'");

        let ts = Utc.with_ymd_and_hms(2019, 10, 1, 15, 1, 0).unwrap();
        assert_eq!(sql(v(ts)), "'2019-10-01T15:01:00Z'");
    }

    #[test]
    fn test_json_value() {
        assert_eq!(sql(v(serde_json::json!({"a": 1}))), r#"'{"a":1}'"#);
    }

    #[test]
    fn test_functions_casts_aliases_and_ordering() {
        assert_eq!(sql(count(star())), "COUNT(*)");
        assert_eq!(sql(func("NOW", Vec::new())), "NOW()");
        assert_eq!(sql(coalesce(vec![c("a"), v(0)])), r#"COALESCE("a", 0)"#);
        assert_eq!(sql(c("a").cast("TEXT")), r#"CAST("a" AS TEXT)"#);
        assert_eq!(sql(sum(c("a")).as_("total")), r#"SUM("a") AS "total""#);
        assert_eq!(sql(c("a").asc()), r#""a" ASC"#);
        assert_eq!(sql(c("a").desc().nulls_first()), r#""a" DESC NULLS FIRST"#);
        assert_eq!(sql(c("a").nulls_last()), r#""a" ASC NULLS LAST"#);
    }

    #[test]
    fn test_assignment() {
        assert_eq!(sql(c("a").set("b")), r#""a"='b'"#);
    }

    #[test]
    fn test_unsupported_operator() {
        let err = render_expression(&SqliteDialect::new(), &c("a").regexp_like("^a"), false)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperator { .. }));
        assert_eq!(sql_with(&SqliteDialect::new(), c("a").ilike("A%")), "(`a` LIKE 'A%')");
    }

    #[test]
    fn test_mysql_operator_spelling() {
        let mysql = MySqlDialect::new();
        assert_eq!(sql_with(&mysql, c("a").like("a%")), "(`a` LIKE BINARY 'a%')");
        assert_eq!(sql_with(&mysql, c("a").regexp_ilike("^a")), "(`a` REGEXP '^a')");
        assert_eq!(sql(c("a").regexp_not_ilike("^a")), r#"("a" !~* '^a')"#);
    }
}
