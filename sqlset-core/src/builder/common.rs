//! Common types and traits shared across the dataset builders

use serde::{Deserialize, Serialize};

use crate::expression::{ColumnList, Ex, ExOr, Expression, Identifier, IntoExpression};
use crate::Dataset;

/// Trait for things usable as a single column or source
///
/// Strings are parsed as (possibly qualified) identifiers, so `"users.id"`
/// becomes `"users"."id"`.
pub trait IntoColumn {
    fn into_column(self) -> Expression;
}

impl IntoColumn for &str {
    fn into_column(self) -> Expression {
        Expression::Identifier(Identifier::parse(self))
    }
}

impl IntoColumn for String {
    fn into_column(self) -> Expression {
        Expression::Identifier(Identifier::parse(&self))
    }
}

impl IntoColumn for &String {
    fn into_column(self) -> Expression {
        Expression::Identifier(Identifier::parse(self))
    }
}

impl IntoColumn for Expression {
    fn into_column(self) -> Expression {
        self
    }
}

impl IntoColumn for Identifier {
    fn into_column(self) -> Expression {
        Expression::Identifier(self)
    }
}

impl IntoColumn for Dataset {
    fn into_column(self) -> Expression {
        self.into_expression()
    }
}

impl IntoColumn for &Dataset {
    fn into_column(self) -> Expression {
        self.clone().into_expression()
    }
}

/// Trait to convert various types into column lists
pub trait IntoColumns {
    fn into_columns(self) -> Vec<Expression>;
}

impl<C: IntoColumn> IntoColumns for C {
    fn into_columns(self) -> Vec<Expression> {
        vec![self.into_column()]
    }
}

impl<C: IntoColumn> IntoColumns for Vec<C> {
    fn into_columns(self) -> Vec<Expression> {
        self.into_iter().map(IntoColumn::into_column).collect()
    }
}

impl<C: IntoColumn, const N: usize> IntoColumns for [C; N] {
    fn into_columns(self) -> Vec<Expression> {
        self.into_iter().map(IntoColumn::into_column).collect()
    }
}

impl IntoColumns for ColumnList {
    fn into_columns(self) -> Vec<Expression> {
        self.items
    }
}

impl IntoColumns for () {
    fn into_columns(self) -> Vec<Expression> {
        Vec::new()
    }
}

macro_rules! impl_into_columns_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: IntoColumn),+> IntoColumns for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_columns(self) -> Vec<Expression> {
                let ($($name,)+) = self;
                vec![$($name.into_column()),+]
            }
        }
    };
}

impl_into_columns_for_tuple!(A, B);
impl_into_columns_for_tuple!(A, B, C);
impl_into_columns_for_tuple!(A, B, C, D);
impl_into_columns_for_tuple!(A, B, C, D, E);
impl_into_columns_for_tuple!(A, B, C, D, E, F);

/// Trait for arguments of `where_`, `having` and `order`
pub trait IntoExpressions {
    fn into_expressions(self) -> Vec<Expression>;
}

impl IntoExpressions for Expression {
    fn into_expressions(self) -> Vec<Expression> {
        vec![self]
    }
}

impl IntoExpressions for Vec<Expression> {
    fn into_expressions(self) -> Vec<Expression> {
        self
    }
}

impl<const N: usize> IntoExpressions for [Expression; N] {
    fn into_expressions(self) -> Vec<Expression> {
        self.into_iter().collect()
    }
}

impl IntoExpressions for Ex {
    fn into_expressions(self) -> Vec<Expression> {
        vec![self.into_expression()]
    }
}

impl IntoExpressions for ExOr {
    fn into_expressions(self) -> Vec<Expression> {
        vec![self.into_expression()]
    }
}

/// JOIN types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    Inner,
    FullOuter,
    RightOuter,
    LeftOuter,
    Full,
    Right,
    Left,
    Natural,
    NaturalLeft,
    NaturalRight,
    NaturalFull,
    Cross,
}

impl JoinType {
    /// Whether the join needs an ON / USING condition
    pub fn is_conditioned(&self) -> bool {
        !matches!(
            self,
            JoinType::Natural
                | JoinType::NaturalLeft
                | JoinType::NaturalRight
                | JoinType::NaturalFull
                | JoinType::Cross
        )
    }
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER JOIN"),
            JoinType::FullOuter => write!(f, "FULL OUTER JOIN"),
            JoinType::RightOuter => write!(f, "RIGHT OUTER JOIN"),
            JoinType::LeftOuter => write!(f, "LEFT OUTER JOIN"),
            JoinType::Full => write!(f, "FULL JOIN"),
            JoinType::Right => write!(f, "RIGHT JOIN"),
            JoinType::Left => write!(f, "LEFT JOIN"),
            JoinType::Natural => write!(f, "NATURAL JOIN"),
            JoinType::NaturalLeft => write!(f, "NATURAL LEFT JOIN"),
            JoinType::NaturalRight => write!(f, "NATURAL RIGHT JOIN"),
            JoinType::NaturalFull => write!(f, "NATURAL FULL JOIN"),
            JoinType::Cross => write!(f, "CROSS JOIN"),
        }
    }
}

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// Placement of NULLs in an ORDER BY term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullsPosition {
    #[default]
    Unspecified,
    First,
    Last,
}
