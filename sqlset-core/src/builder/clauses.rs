use crate::expression::{
    ColumnList, CompoundExpression, ExpressionList, Identifier, JoinExpression,
};

/// Row limit of a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Rows(u64),
    /// `LIMIT ALL`
    All,
}

/// Snapshot of every clause of a dataset
///
/// Datasets never mutate a `Clauses` in place once shared; each builder call
/// clones it and changes the copy.
#[derive(Debug, Clone, Default)]
pub struct Clauses {
    pub select: ColumnList,
    pub distinct: bool,
    pub from: ColumnList,
    pub joins: Vec<JoinExpression>,
    pub where_: Option<ExpressionList>,
    pub alias: Option<Identifier>,
    pub group_by: ColumnList,
    pub having: Option<ExpressionList>,
    pub order: ColumnList,
    pub limit: Option<Limit>,
    pub offset: u64,
    pub returning: ColumnList,
    pub compounds: Vec<CompoundExpression>,
}

impl Clauses {
    pub fn has_sources(&self) -> bool {
        !self.from.is_empty()
    }

    /// Whether compound operations must wrap this side in a subquery
    pub fn needs_compound_wrap(&self) -> bool {
        !self.order.is_empty() || self.limit.is_some()
    }
}
