//! Expression model
//!
//! Every piece of a statement (identifiers, values, comparisons, functions,
//! joins, nested datasets) is an [`Expression`]. Expressions are plain data;
//! the dialect renderer in [`crate::render`] turns them into SQL text.

mod ex;
mod identifier;

pub use ex::{Ex, ExOr, Op};
pub use identifier::{Identifier, IdentifierColumn};

use chrono::{DateTime, Utc};

use crate::builder::common::{
    IntoColumns, IntoExpressions, JoinType, NullsPosition, SortDirection,
};
use crate::operator::{BooleanOperation, CompoundType, RangeOperation};
use crate::value::Value;
use crate::Dataset;

/// A node of the SQL expression tree
#[derive(Debug, Clone)]
pub enum Expression {
    Identifier(Identifier),
    Literal(Literal),
    Boolean(Box<BooleanExpression>),
    Range(Box<RangeExpression>),
    List(ExpressionList),
    Ordered(Box<OrderedExpression>),
    Function(FunctionExpression),
    Cast(Box<CastExpression>),
    Columns(ColumnList),
    Aliased(Box<AliasedExpression>),
    Join(Box<JoinExpression>),
    Compound(Box<CompoundExpression>),
    Update(Box<UpdateExpression>),
    Value(Value),
    Dataset(Box<Dataset>),
}

/// Raw SQL text; each `?` is replaced by the next rendered argument
#[derive(Debug, Clone)]
pub struct Literal {
    pub sql: String,
    pub args: Vec<Expression>,
}

impl Literal {
    pub fn new(sql: impl Into<String>, args: Vec<Expression>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    pub fn star() -> Self {
        Self::new("*", Vec::new())
    }
}

#[derive(Debug, Clone)]
pub struct BooleanExpression {
    pub op: BooleanOperation,
    pub lhs: Expression,
    pub rhs: Expression,
}

#[derive(Debug, Clone)]
pub struct RangeExpression {
    pub op: RangeOperation,
    pub lhs: Expression,
    pub start: Expression,
    pub end: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    And,
    Or,
}

/// Conditions joined with AND or OR
#[derive(Debug, Clone)]
pub struct ExpressionList {
    pub kind: ListType,
    pub items: Vec<Expression>,
}

impl ExpressionList {
    /// Empty nested lists (an empty `Ex`, `and([])`, ...) are dropped
    pub fn new(kind: ListType, items: Vec<Expression>) -> Self {
        let mut list = Self {
            kind,
            items: Vec::with_capacity(items.len()),
        };
        list.append(items);
        list
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn append(&mut self, items: Vec<Expression>) {
        self.items.extend(
            items
                .into_iter()
                .filter(|item| !matches!(item, Expression::List(list) if list.is_empty())),
        );
    }
}

/// Comma separated columns; empty renders as `*`
#[derive(Debug, Clone, Default)]
pub struct ColumnList {
    pub items: Vec<Expression>,
}

impl ColumnList {
    pub fn new(items: Vec<Expression>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn append(&mut self, items: Vec<Expression>) {
        self.items.extend(items);
    }
}

#[derive(Debug, Clone)]
pub struct OrderedExpression {
    pub expr: Expression,
    pub direction: SortDirection,
    pub nulls: NullsPosition,
}

#[derive(Debug, Clone)]
pub struct FunctionExpression {
    pub name: String,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct CastExpression {
    pub expr: Expression,
    pub target: String,
}

#[derive(Debug, Clone)]
pub struct AliasedExpression {
    pub inner: Expression,
    pub alias: Identifier,
}

/// ON or USING part of a join
#[derive(Debug, Clone)]
pub enum JoinCondition {
    On(ExpressionList),
    Using(ColumnList),
}

#[derive(Debug, Clone)]
pub struct JoinExpression {
    pub join_type: JoinType,
    pub table: Expression,
    pub condition: Option<JoinCondition>,
}

#[derive(Debug, Clone)]
pub struct CompoundExpression {
    pub kind: CompoundType,
    pub rhs: Dataset,
}

/// A `column = value` assignment of an UPDATE or upsert
#[derive(Debug, Clone)]
pub struct UpdateExpression {
    pub column: Expression,
    pub value: Expression,
}

/// Conversion of Rust values and expressions into expression nodes
///
/// Plain values become [`Expression::Value`] so they render as literals or
/// placeholders.
pub trait IntoExpression {
    fn into_expression(self) -> Expression;
}

impl IntoExpression for Expression {
    fn into_expression(self) -> Expression {
        self
    }
}

impl IntoExpression for Identifier {
    fn into_expression(self) -> Expression {
        Expression::Identifier(self)
    }
}

impl IntoExpression for Value {
    fn into_expression(self) -> Expression {
        Expression::Value(self)
    }
}

impl IntoExpression for Dataset {
    fn into_expression(self) -> Expression {
        Expression::Dataset(Box::new(self))
    }
}

impl IntoExpression for &Dataset {
    fn into_expression(self) -> Expression {
        Expression::Dataset(Box::new(self.clone()))
    }
}

macro_rules! impl_into_expression_for_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl IntoExpression for $ty {
                fn into_expression(self) -> Expression {
                    Expression::Value(Value::from(self))
                }
            }
        )+
    };
}

impl_into_expression_for_value!(
    bool,
    i32,
    i64,
    u32,
    u64,
    f32,
    f64,
    String,
    &str,
    &String,
    DateTime<Utc>,
    serde_json::Value,
);

#[cfg(feature = "uuid-support")]
impl_into_expression_for_value!(uuid::Uuid);

#[cfg(feature = "decimal-support")]
impl_into_expression_for_value!(rust_decimal::Decimal);

impl<T: Into<Value>> IntoExpression for Option<T> {
    fn into_expression(self) -> Expression {
        Expression::Value(Value::from(self))
    }
}

impl<T: Into<Value>> IntoExpression for Vec<T> {
    fn into_expression(self) -> Expression {
        Expression::Value(Value::from(self))
    }
}

/// Unqualified column, never split on dots
pub fn c(column: impl Into<String>) -> Expression {
    Expression::Identifier(Identifier::column(column))
}

/// Parsed identifier: `col`, `table.col` or `schema.table.col`
pub fn i(ident: &str) -> Expression {
    Expression::Identifier(Identifier::parse(ident))
}

/// Table identifier
pub fn t(table: impl Into<String>) -> Expression {
    Expression::Identifier(Identifier::table(table))
}

/// Schema identifier
pub fn s(schema: impl Into<String>) -> Expression {
    Expression::Identifier(Identifier::schema(schema))
}

/// Explicit value
pub fn v(value: impl Into<Value>) -> Expression {
    Expression::Value(value.into())
}

/// Raw SQL without arguments
pub fn l(sql: impl Into<String>) -> Expression {
    Expression::Literal(Literal::new(sql, Vec::new()))
}

/// Raw SQL with `?` argument markers
pub fn l_with(sql: impl Into<String>, args: Vec<Expression>) -> Expression {
    Expression::Literal(Literal::new(sql, args))
}

pub fn star() -> Expression {
    Expression::Literal(Literal::star())
}

pub fn default_value() -> Expression {
    l("DEFAULT")
}

/// SQL function call `NAME(args...)`
pub fn func(name: impl Into<String>, args: Vec<Expression>) -> Expression {
    Expression::Function(FunctionExpression {
        name: name.into(),
        args,
    })
}

pub fn count(expr: impl IntoExpression) -> Expression {
    func("COUNT", vec![expr.into_expression()])
}

pub fn sum(expr: impl IntoExpression) -> Expression {
    func("SUM", vec![expr.into_expression()])
}

pub fn avg(expr: impl IntoExpression) -> Expression {
    func("AVG", vec![expr.into_expression()])
}

pub fn min(expr: impl IntoExpression) -> Expression {
    func("MIN", vec![expr.into_expression()])
}

pub fn max(expr: impl IntoExpression) -> Expression {
    func("MAX", vec![expr.into_expression()])
}

pub fn first(expr: impl IntoExpression) -> Expression {
    func("FIRST", vec![expr.into_expression()])
}

pub fn last(expr: impl IntoExpression) -> Expression {
    func("LAST", vec![expr.into_expression()])
}

pub fn distinct(expr: impl IntoExpression) -> Expression {
    func("DISTINCT", vec![expr.into_expression()])
}

pub fn coalesce(args: Vec<Expression>) -> Expression {
    func("COALESCE", args)
}

pub fn cast(expr: impl IntoExpression, target: impl Into<String>) -> Expression {
    expr.into_expression().cast(target)
}

/// AND-ed condition list
pub fn and(exprs: impl IntoExpressions) -> Expression {
    Expression::List(ExpressionList::new(ListType::And, exprs.into_expressions()))
}

/// OR-ed condition list
pub fn or(exprs: impl IntoExpressions) -> Expression {
    Expression::List(ExpressionList::new(ListType::Or, exprs.into_expressions()))
}

/// `ON` join condition
pub fn on(exprs: impl IntoExpressions) -> JoinCondition {
    JoinCondition::On(ExpressionList::new(ListType::And, exprs.into_expressions()))
}

/// `USING` join condition
pub fn using(columns: impl IntoColumns) -> JoinCondition {
    JoinCondition::Using(ColumnList::new(columns.into_columns()))
}

impl Expression {
    pub fn boolean(op: BooleanOperation, lhs: Expression, rhs: Expression) -> Self {
        Expression::Boolean(Box::new(BooleanExpression { op, lhs, rhs }))
    }

    pub fn range(op: RangeOperation, lhs: Expression, start: Expression, end: Expression) -> Self {
        Expression::Range(Box::new(RangeExpression {
            op,
            lhs,
            start,
            end,
        }))
    }

    fn compare(self, op: BooleanOperation, rhs: impl IntoExpression) -> Self {
        Expression::boolean(op, self, rhs.into_expression())
    }

    pub fn eq(self, rhs: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::Eq, rhs)
    }

    pub fn neq(self, rhs: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::Neq, rhs)
    }

    pub fn gt(self, rhs: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::Gt, rhs)
    }

    pub fn gte(self, rhs: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::Gte, rhs)
    }

    pub fn lt(self, rhs: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::Lt, rhs)
    }

    pub fn lte(self, rhs: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::Lte, rhs)
    }

    pub fn like(self, pattern: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::Like, pattern)
    }

    pub fn not_like(self, pattern: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::NotLike, pattern)
    }

    pub fn ilike(self, pattern: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::ILike, pattern)
    }

    pub fn not_ilike(self, pattern: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::NotILike, pattern)
    }

    pub fn regexp_like(self, pattern: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::RegexpLike, pattern)
    }

    pub fn regexp_not_like(self, pattern: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::RegexpNotLike, pattern)
    }

    pub fn regexp_ilike(self, pattern: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::RegexpILike, pattern)
    }

    pub fn regexp_not_ilike(self, pattern: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::RegexpNotILike, pattern)
    }

    pub fn is(self, rhs: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::Is, rhs)
    }

    pub fn is_not(self, rhs: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::IsNot, rhs)
    }

    pub fn is_null(self) -> Self {
        self.is(Value::Null)
    }

    pub fn is_not_null(self) -> Self {
        self.is_not(Value::Null)
    }

    pub fn is_true(self) -> Self {
        self.is(true)
    }

    pub fn is_not_true(self) -> Self {
        self.is_not(true)
    }

    pub fn is_false(self) -> Self {
        self.is(false)
    }

    pub fn is_not_false(self) -> Self {
        self.is_not(false)
    }

    pub fn in_(self, rhs: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::In, rhs)
    }

    pub fn not_in(self, rhs: impl IntoExpression) -> Self {
        self.compare(BooleanOperation::NotIn, rhs)
    }

    pub fn between(self, start: impl IntoExpression, end: impl IntoExpression) -> Self {
        Expression::range(
            RangeOperation::Between,
            self,
            start.into_expression(),
            end.into_expression(),
        )
    }

    pub fn not_between(self, start: impl IntoExpression, end: impl IntoExpression) -> Self {
        Expression::range(
            RangeOperation::NotBetween,
            self,
            start.into_expression(),
            end.into_expression(),
        )
    }

    /// Alias the expression: `expr AS "alias"`
    pub fn as_(self, alias: impl Into<String>) -> Self {
        Expression::Aliased(Box::new(AliasedExpression {
            inner: self,
            alias: Identifier::column(alias),
        }))
    }

    pub fn asc(self) -> Self {
        self.ordered(SortDirection::Asc)
    }

    pub fn desc(self) -> Self {
        self.ordered(SortDirection::Desc)
    }

    fn ordered(self, direction: SortDirection) -> Self {
        Expression::Ordered(Box::new(OrderedExpression {
            expr: self,
            direction,
            nulls: NullsPosition::Unspecified,
        }))
    }

    /// Sort NULLs first; unordered expressions are sorted ascending
    pub fn nulls_first(self) -> Self {
        self.with_nulls(NullsPosition::First)
    }

    /// Sort NULLs last; unordered expressions are sorted ascending
    pub fn nulls_last(self) -> Self {
        self.with_nulls(NullsPosition::Last)
    }

    fn with_nulls(self, nulls: NullsPosition) -> Self {
        match self {
            Expression::Ordered(mut ordered) => {
                ordered.nulls = nulls;
                Expression::Ordered(ordered)
            }
            other => Expression::Ordered(Box::new(OrderedExpression {
                expr: other,
                direction: SortDirection::Asc,
                nulls,
            })),
        }
    }

    /// `CAST(expr AS target)`
    pub fn cast(self, target: impl Into<String>) -> Self {
        Expression::Cast(Box::new(CastExpression {
            expr: self,
            target: target.into(),
        }))
    }

    /// Assignment for UPDATE and upsert statements
    pub fn set(self, value: impl IntoExpression) -> Self {
        Expression::Update(Box::new(UpdateExpression {
            column: self,
            value: value.into_expression(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_builds_boolean() {
        match c("age").gt(18) {
            Expression::Boolean(b) => {
                assert_eq!(b.op, BooleanOperation::Gt);
                assert!(matches!(b.rhs, Expression::Value(Value::I32(18))));
            }
            other => panic!("unexpected expression {:?}", other),
        }
    }

    #[test]
    fn test_is_null_uses_null_value() {
        match c("deleted_at").is_null() {
            Expression::Boolean(b) => {
                assert_eq!(b.op, BooleanOperation::Is);
                assert!(matches!(b.rhs, Expression::Value(Value::Null)));
            }
            other => panic!("unexpected expression {:?}", other),
        }
    }

    #[test]
    fn test_option_and_vec_values() {
        assert!(matches!(
            None::<i32>.into_expression(),
            Expression::Value(Value::Null)
        ));
        assert!(matches!(
            vec![1, 2].into_expression(),
            Expression::Value(Value::Array(ref items)) if items.len() == 2
        ));
    }

    #[test]
    fn test_nulls_keep_direction() {
        match c("a").desc().nulls_last() {
            Expression::Ordered(o) => {
                assert_eq!(o.direction, SortDirection::Desc);
                assert_eq!(o.nulls, NullsPosition::Last);
            }
            other => panic!("unexpected expression {:?}", other),
        }

        match c("a").nulls_first() {
            Expression::Ordered(o) => assert_eq!(o.direction, SortDirection::Asc),
            other => panic!("unexpected expression {:?}", other),
        }
    }

    #[test]
    fn test_function_helpers() {
        match count(star()) {
            Expression::Function(f) => {
                assert_eq!(f.name, "COUNT");
                assert_eq!(f.args.len(), 1);
            }
            other => panic!("unexpected expression {:?}", other),
        }
    }

    #[test]
    fn test_join_conditions() {
        assert!(matches!(on(c("a").eq(c("b"))), JoinCondition::On(ref l) if l.items.len() == 1));
        assert!(matches!(using(("a", "b")), JoinCondition::Using(ref cols) if cols.items.len() == 2));
    }
}
