//! Immutable dataset builder
//!
//! A [`Dataset`] is a clause snapshot bound to a dialect. Every builder
//! method takes `&self` and returns a new dataset, so a dataset can be
//! shared and extended from several places without interference.

use std::sync::Arc;

use super::clauses::{Clauses, Limit};
use super::common::{IntoColumns, IntoExpressions, JoinType};
use crate::dialect::{DefaultDialect, Dialect};
use crate::expression::{
    ColumnList, CompoundExpression, Expression, ExpressionList, Identifier, IntoExpression,
    JoinCondition, JoinExpression, ListType,
};
use crate::operator::CompoundType;

#[derive(Debug, Clone)]
pub struct Dataset {
    dialect: Arc<dyn Dialect>,
    clauses: Clauses,
    prepared: bool,
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new(Arc::new(DefaultDialect::new()))
    }
}

impl Dataset {
    /// Empty dataset for the given dialect
    pub fn new(dialect: Arc<dyn Dialect>) -> Self {
        Self {
            dialect,
            clauses: Clauses::default(),
            prepared: false,
        }
    }

    pub fn dialect(&self) -> &Arc<dyn Dialect> {
        &self.dialect
    }

    pub fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    fn with_clauses(&self, f: impl FnOnce(&mut Clauses)) -> Self {
        let mut ds = self.clone();
        f(&mut ds.clauses);
        ds
    }

    /// Render placeholders plus an argument list instead of inline literals
    pub fn prepared(&self, prepared: bool) -> Self {
        let mut ds = self.clone();
        ds.prepared = prepared;
        ds
    }

    pub fn with_dialect(&self, dialect: Arc<dyn Dialect>) -> Self {
        let mut ds = self.clone();
        ds.dialect = dialect;
        ds
    }

    pub fn select(&self, columns: impl IntoColumns) -> Self {
        let columns = columns.into_columns();
        self.with_clauses(|c| {
            c.select = ColumnList::new(columns);
            c.distinct = false;
        })
    }

    pub fn select_distinct(&self, columns: impl IntoColumns) -> Self {
        let columns = columns.into_columns();
        self.with_clauses(|c| {
            c.select = ColumnList::new(columns);
            c.distinct = true;
        })
    }

    pub fn select_append(&self, columns: impl IntoColumns) -> Self {
        let columns = columns.into_columns();
        self.with_clauses(|c| c.select.append(columns))
    }

    pub fn clear_select(&self) -> Self {
        self.with_clauses(|c| {
            c.select = ColumnList::default();
            c.distinct = false;
        })
    }

    /// Replace the sources. Unaliased datasets are aliased `t1`, `t2`, ...
    pub fn from(&self, sources: impl IntoColumns) -> Self {
        let mut numbered = 0;
        let sources = sources
            .into_columns()
            .into_iter()
            .map(|source| match source {
                Expression::Dataset(ds) if ds.clauses.alias.is_none() => {
                    numbered += 1;
                    ds.as_(format!("t{}", numbered)).into_expression()
                }
                other => other,
            })
            .collect();
        self.with_clauses(|c| c.from = ColumnList::new(sources))
    }

    /// Wrap the current statement: `SELECT * FROM (...) AS "t1"`
    pub fn from_self(&self) -> Self {
        let mut ds = Dataset::new(self.dialect.clone()).from(self);
        ds.prepared = self.prepared;
        ds
    }

    /// AND-append conditions to the WHERE clause
    pub fn where_(&self, conditions: impl IntoExpressions) -> Self {
        let conditions = ExpressionList::new(ListType::And, conditions.into_expressions());
        if conditions.is_empty() {
            return self.clone();
        }
        self.with_clauses(|c| append_condition(&mut c.where_, conditions.items))
    }

    pub fn clear_where(&self) -> Self {
        self.with_clauses(|c| c.where_ = None)
    }

    /// Add a join of any type
    pub fn join(
        &self,
        join_type: JoinType,
        table: impl IntoColumns,
        condition: Option<JoinCondition>,
    ) -> Self {
        let table = single_source(table);
        self.with_clauses(|c| {
            c.joins.push(JoinExpression {
                join_type,
                table,
                condition,
            })
        })
    }

    pub fn inner_join(&self, table: impl IntoColumns, condition: JoinCondition) -> Self {
        self.join(JoinType::Inner, table, Some(condition))
    }

    pub fn left_join(&self, table: impl IntoColumns, condition: JoinCondition) -> Self {
        self.join(JoinType::Left, table, Some(condition))
    }

    pub fn right_join(&self, table: impl IntoColumns, condition: JoinCondition) -> Self {
        self.join(JoinType::Right, table, Some(condition))
    }

    pub fn full_join(&self, table: impl IntoColumns, condition: JoinCondition) -> Self {
        self.join(JoinType::Full, table, Some(condition))
    }

    pub fn left_outer_join(&self, table: impl IntoColumns, condition: JoinCondition) -> Self {
        self.join(JoinType::LeftOuter, table, Some(condition))
    }

    pub fn right_outer_join(&self, table: impl IntoColumns, condition: JoinCondition) -> Self {
        self.join(JoinType::RightOuter, table, Some(condition))
    }

    pub fn full_outer_join(&self, table: impl IntoColumns, condition: JoinCondition) -> Self {
        self.join(JoinType::FullOuter, table, Some(condition))
    }

    pub fn natural_join(&self, table: impl IntoColumns) -> Self {
        self.join(JoinType::Natural, table, None)
    }

    pub fn natural_left_join(&self, table: impl IntoColumns) -> Self {
        self.join(JoinType::NaturalLeft, table, None)
    }

    pub fn natural_right_join(&self, table: impl IntoColumns) -> Self {
        self.join(JoinType::NaturalRight, table, None)
    }

    pub fn natural_full_join(&self, table: impl IntoColumns) -> Self {
        self.join(JoinType::NaturalFull, table, None)
    }

    pub fn cross_join(&self, table: impl IntoColumns) -> Self {
        self.join(JoinType::Cross, table, None)
    }

    pub fn group_by(&self, columns: impl IntoColumns) -> Self {
        let columns = columns.into_columns();
        self.with_clauses(|c| c.group_by = ColumnList::new(columns))
    }

    /// AND-append conditions to the HAVING clause
    pub fn having(&self, conditions: impl IntoExpressions) -> Self {
        let conditions = ExpressionList::new(ListType::And, conditions.into_expressions());
        if conditions.is_empty() {
            return self.clone();
        }
        self.with_clauses(|c| append_condition(&mut c.having, conditions.items))
    }

    /// Replace the ORDER BY terms
    pub fn order(&self, terms: impl IntoExpressions) -> Self {
        let terms = terms.into_expressions();
        self.with_clauses(|c| c.order = ColumnList::new(terms))
    }

    pub fn order_append(&self, terms: impl IntoExpressions) -> Self {
        let terms = terms.into_expressions();
        self.with_clauses(|c| c.order.append(terms))
    }

    pub fn clear_order(&self) -> Self {
        self.with_clauses(|c| c.order = ColumnList::default())
    }

    /// Limit the number of rows; `0` removes the limit
    pub fn limit(&self, limit: u64) -> Self {
        self.with_clauses(|c| c.limit = (limit > 0).then_some(Limit::Rows(limit)))
    }

    pub fn limit_all(&self) -> Self {
        self.with_clauses(|c| c.limit = Some(Limit::All))
    }

    pub fn clear_limit(&self) -> Self {
        self.with_clauses(|c| c.limit = None)
    }

    /// Skip rows; `0` removes the offset
    pub fn offset(&self, offset: u64) -> Self {
        self.with_clauses(|c| c.offset = offset)
    }

    pub fn clear_offset(&self) -> Self {
        self.with_clauses(|c| c.offset = 0)
    }

    pub fn returning(&self, columns: impl IntoColumns) -> Self {
        let columns = columns.into_columns();
        self.with_clauses(|c| c.returning = ColumnList::new(columns))
    }

    /// Alias used when this dataset is nested in another statement
    pub fn as_(&self, alias: impl Into<String>) -> Self {
        let alias = Identifier::column(alias);
        self.with_clauses(|c| c.alias = Some(alias))
    }

    pub fn union(&self, other: &Dataset) -> Self {
        self.compound(CompoundType::Union, other)
    }

    pub fn union_all(&self, other: &Dataset) -> Self {
        self.compound(CompoundType::UnionAll, other)
    }

    pub fn intersect(&self, other: &Dataset) -> Self {
        self.compound(CompoundType::Intersect, other)
    }

    pub fn intersect_all(&self, other: &Dataset) -> Self {
        self.compound(CompoundType::IntersectAll, other)
    }

    fn compound(&self, kind: CompoundType, other: &Dataset) -> Self {
        let mut ds = self.compound_side();
        ds.clauses.compounds.push(CompoundExpression {
            kind,
            rhs: other.compound_side(),
        });
        ds
    }

    /// A side carrying ORDER BY or LIMIT is wrapped so the compound stays valid
    fn compound_side(&self) -> Self {
        if self.clauses.needs_compound_wrap() {
            self.from_self()
        } else {
            self.clone()
        }
    }
}

fn append_condition(target: &mut Option<ExpressionList>, conditions: Vec<Expression>) {
    match target {
        Some(list) => list.append(conditions),
        None => *target = Some(ExpressionList::new(ListType::And, conditions)),
    }
}

fn single_source(table: impl IntoColumns) -> Expression {
    let mut sources = table.into_columns();
    if sources.len() == 1 {
        sources.remove(0)
    } else {
        Expression::Columns(ColumnList::new(sources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::c;

    #[test]
    fn test_builders_do_not_mutate_receiver() {
        let base = Dataset::default().from("items");
        let filtered = base.where_(c("a").eq(1)).limit(10).order(c("a").asc());

        assert!(base.clauses().where_.is_none());
        assert!(base.clauses().limit.is_none());
        assert!(base.clauses().order.is_empty());
        assert!(filtered.clauses().where_.is_some());
    }

    #[test]
    fn test_where_appends_with_and() {
        let ds = Dataset::default()
            .from("items")
            .where_(c("a").eq(1))
            .where_([c("b").eq(2), c("c").eq(3)]);
        let list = ds.clauses().where_.as_ref().unwrap();
        assert_eq!(list.kind, ListType::And);
        assert_eq!(list.items.len(), 3);
    }

    #[test]
    fn test_empty_where_is_noop() {
        let ds = Dataset::default().from("items").where_(Vec::<Expression>::new());
        assert!(ds.clauses().where_.is_none());
    }

    #[test]
    fn test_limit_zero_clears() {
        let ds = Dataset::default().from("items").limit(5);
        assert_eq!(ds.clauses().limit, Some(Limit::Rows(5)));
        assert_eq!(ds.limit(0).clauses().limit, None);
        assert_eq!(ds.limit_all().clauses().limit, Some(Limit::All));
        assert_eq!(ds.clear_limit().clauses().limit, None);
    }

    #[test]
    fn test_select_and_distinct_are_exclusive() {
        let ds = Dataset::default().from("items").select_distinct("a");
        assert!(ds.clauses().distinct);
        let ds = ds.select(("a", "b"));
        assert!(!ds.clauses().distinct);
        assert_eq!(ds.clauses().select.items.len(), 2);
        assert_eq!(ds.select_append("c").clauses().select.items.len(), 3);
    }

    #[test]
    fn test_from_aliases_nested_datasets() {
        let inner = Dataset::default().from("a");
        let ds = Dataset::default().from(vec![inner.clone(), inner.as_("x"), inner]);
        let aliases: Vec<String> = ds
            .clauses()
            .from
            .items
            .iter()
            .map(|item| match item {
                Expression::Dataset(ds) => ds.clauses().alias.as_ref().unwrap().to_string(),
                other => panic!("unexpected source {:?}", other),
            })
            .collect();
        assert_eq!(aliases, vec!["t1", "x", "t2"]);
    }

    #[test]
    fn test_prepared_flag_is_copied() {
        let ds = Dataset::default().from("a").prepared(true);
        assert!(ds.where_(c("a").eq(1)).is_prepared());
        assert!(ds.from_self().is_prepared());
        assert!(!Dataset::default().is_prepared());
    }

    #[test]
    fn test_compound_wraps_ordered_side() {
        let ds = Dataset::default()
            .from("a")
            .union(&Dataset::default().from("b").limit(1));
        let rhs = &ds.clauses().compounds[0].rhs;
        assert!(rhs.clauses().limit.is_none());
        assert!(matches!(rhs.clauses().from.items[0], Expression::Dataset(_)));
    }
}
