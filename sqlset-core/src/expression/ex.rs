//! Map-style condition shorthands
//!
//! `Ex` turns `column -> value` pairs into an AND-ed condition list, `ExOr`
//! into an OR-ed one. Columns are emitted in sorted order so the generated
//! SQL is stable.

use std::collections::BTreeMap;

use super::{c, Expression, ExpressionList, IntoExpression, ListType};
use crate::operator::{BooleanOperation, RangeOperation};

/// Operator entry for a single column in an [`Ex`] / [`ExOr`]
#[derive(Debug, Clone)]
pub enum Op {
    Compare(BooleanOperation, Expression),
    Range(RangeOperation, Expression, Expression),
}

impl Op {
    pub fn eq(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::Eq, value.into_expression())
    }

    pub fn neq(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::Neq, value.into_expression())
    }

    pub fn gt(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::Gt, value.into_expression())
    }

    pub fn gte(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::Gte, value.into_expression())
    }

    pub fn lt(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::Lt, value.into_expression())
    }

    pub fn lte(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::Lte, value.into_expression())
    }

    pub fn is(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::Is, value.into_expression())
    }

    pub fn is_not(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::IsNot, value.into_expression())
    }

    pub fn in_(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::In, value.into_expression())
    }

    pub fn not_in(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::NotIn, value.into_expression())
    }

    pub fn like(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::Like, value.into_expression())
    }

    pub fn not_like(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::NotLike, value.into_expression())
    }

    pub fn ilike(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::ILike, value.into_expression())
    }

    pub fn not_ilike(value: impl IntoExpression) -> Self {
        Op::Compare(BooleanOperation::NotILike, value.into_expression())
    }

    pub fn between(start: impl IntoExpression, end: impl IntoExpression) -> Self {
        Op::Range(
            RangeOperation::Between,
            start.into_expression(),
            end.into_expression(),
        )
    }

    pub fn not_between(start: impl IntoExpression, end: impl IntoExpression) -> Self {
        Op::Range(
            RangeOperation::NotBetween,
            start.into_expression(),
            end.into_expression(),
        )
    }

    fn apply(self, column: &str) -> Expression {
        match self {
            Op::Compare(op, value) => Expression::boolean(op, c(column), value),
            Op::Range(op, start, end) => Expression::range(op, c(column), start, end),
        }
    }
}

fn to_list(kind: ListType, entries: BTreeMap<String, Vec<Op>>) -> Expression {
    let mut items = Vec::new();
    for (column, ops) in entries {
        let exprs: Vec<Expression> = ops.into_iter().map(|op| op.apply(&column)).collect();
        if exprs.len() == 1 {
            items.extend(exprs);
        } else {
            // several operators on one column are always AND-ed
            items.push(Expression::List(ExpressionList::new(ListType::And, exprs)));
        }
    }
    Expression::List(ExpressionList::new(kind, items))
}

/// Column/value pairs combined with AND
///
/// A plain value means equality; `None`/NULL and booleans turn into `IS`,
/// arrays and datasets into `IN` when rendered.
#[derive(Debug, Clone, Default)]
pub struct Ex {
    entries: BTreeMap<String, Vec<Op>>,
}

impl Ex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality entry
    pub fn eq(self, column: impl Into<String>, value: impl IntoExpression) -> Self {
        self.op(column, Op::eq(value))
    }

    /// Add an entry with an explicit operator
    pub fn op(mut self, column: impl Into<String>, op: Op) -> Self {
        self.entries.entry(column.into()).or_default().push(op);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoExpression for Ex {
    fn into_expression(self) -> Expression {
        to_list(ListType::And, self.entries)
    }
}

/// Column/value pairs combined with OR
#[derive(Debug, Clone, Default)]
pub struct ExOr {
    entries: BTreeMap<String, Vec<Op>>,
}

impl ExOr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(self, column: impl Into<String>, value: impl IntoExpression) -> Self {
        self.op(column, Op::eq(value))
    }

    pub fn op(mut self, column: impl Into<String>, op: Op) -> Self {
        self.entries.entry(column.into()).or_default().push(op);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoExpression for ExOr {
    fn into_expression(self) -> Expression {
        to_list(ListType::Or, self.entries)
    }
}
