use super::{Render, Renderer};
use crate::builder::clauses::{Clauses, Limit};
use crate::builder::delete::{TruncateIdentity, TruncateOptions};
use crate::builder::insert::ConflictExpression;
use crate::error::{Error, Result};
use crate::expression::{c, ColumnList, ExpressionList, UpdateExpression};
use crate::row::{extract_insert, extract_update, RowSource};
use crate::value::Value;
use crate::Dataset;

/// Rows or sub-select feeding an INSERT
#[derive(Debug, Clone)]
pub enum InsertPayload {
    Rows(Vec<RowSource>),
    Select(Dataset),
}

pub(crate) fn render_select(r: &mut Renderer<'_>, clauses: &Clauses) -> Result<()> {
    let options = r.options();
    r.push(&options.select_clause);
    r.push_char(' ');
    if clauses.distinct {
        r.push(&options.distinct_fragment);
        r.push_char(' ');
    }
    clauses.select.render(r)?;

    if clauses.has_sources() {
        r.push(&options.from_fragment);
        r.push_char(' ');
        clauses.from.render(r)?;
    }
    for join in &clauses.joins {
        join.render(r)?;
    }
    render_where(r, &clauses.where_)?;
    if !clauses.group_by.is_empty() {
        r.push(&options.group_by_fragment);
        clauses.group_by.render(r)?;
    }
    if let Some(having) = clauses.having.as_ref().filter(|h| !h.is_empty()) {
        r.push(&options.having_fragment);
        having.render(r)?;
    }
    for compound in &clauses.compounds {
        compound.render(r)?;
    }
    render_order(r, &clauses.order)?;
    render_limit(r, clauses.limit)?;
    if clauses.offset > 0 {
        r.push(&options.offset_fragment);
        Value::U64(clauses.offset).render(r)?;
    }
    Ok(())
}

pub(crate) fn render_insert(
    r: &mut Renderer<'_>,
    clauses: &Clauses,
    payload: &InsertPayload,
    conflict: Option<&ConflictExpression>,
) -> Result<()> {
    if !clauses.has_sources() {
        return Err(Error::no_source("insert"));
    }
    let options = r.options();
    let ignore = options.supports_insert_ignore
        && matches!(conflict, Some(ConflictExpression::DoNothing));

    if ignore {
        r.push(&options.insert_ignore_clause);
    } else {
        r.push(&options.insert_clause);
    }
    r.push_char(' ');
    clauses.from.render(r)?;

    match payload {
        InsertPayload::Select(dataset) => {
            r.push_char(' ');
            render_select(r, dataset.clauses())?;
        }
        InsertPayload::Rows(rows) => {
            let batch = extract_insert(rows)?;
            if batch.columns.is_empty() {
                r.push(&options.default_values_fragment);
            } else {
                r.push(" (");
                let columns = ColumnList::new(batch.columns.into_iter().map(c).collect());
                columns.render(r)?;
                r.push_char(')');
                r.push(&options.values_fragment);
                for (idx, row) in batch.rows.iter().enumerate() {
                    if idx > 0 {
                        r.push(", ");
                    }
                    r.push_char('(');
                    ColumnList::new(row.clone()).render(r)?;
                    r.push_char(')');
                }
            }
        }
    }

    if let Some(conflict) = conflict {
        if !ignore {
            render_conflict(r, conflict)?;
        }
    }
    render_returning(r, &clauses.returning)
}

fn render_conflict(r: &mut Renderer<'_>, conflict: &ConflictExpression) -> Result<()> {
    let options = r.options();
    match conflict {
        ConflictExpression::DoNothing => {
            r.push(&options.conflict_fragment);
            r.push(&options.conflict_do_nothing_fragment);
            Ok(())
        }
        ConflictExpression::DoUpdate {
            target,
            update,
            where_,
        } => {
            let guard = where_.as_ref().filter(|w| !w.is_empty());
            if guard.is_some() && !options.supports_conflict_update_where {
                return Err(Error::UnsupportedConflictWhere {
                    dialect: r.dialect.name().to_string(),
                });
            }
            let assignments = extract_update(update)?;
            if assignments.is_empty() {
                return Err(Error::NoUpdateValues);
            }

            r.push(&options.conflict_fragment);
            if options.supports_conflict_target && !target.is_empty() {
                r.push(" (");
                r.push(target);
                r.push_char(')');
            }
            r.push(&options.conflict_do_update_fragment);
            render_assignments(r, &assignments)?;
            if let Some(guard) = guard {
                r.push(&options.where_fragment);
                guard.render(r)?;
            }
            Ok(())
        }
    }
}

pub(crate) fn render_update(r: &mut Renderer<'_>, clauses: &Clauses, row: &RowSource) -> Result<()> {
    if !clauses.has_sources() {
        return Err(Error::no_source("update"));
    }
    let assignments = extract_update(row)?;
    if assignments.is_empty() {
        return Err(Error::NoUpdateValues);
    }

    let options = r.options();
    r.push(&options.update_clause);
    r.push_char(' ');
    clauses.from.render(r)?;
    r.push(&options.set_fragment);
    render_assignments(r, &assignments)?;
    render_where(r, &clauses.where_)?;
    if options.supports_order_by_on_update {
        render_order(r, &clauses.order)?;
    }
    if options.supports_limit_on_update {
        render_limit(r, clauses.limit)?;
    }
    render_returning(r, &clauses.returning)
}

pub(crate) fn render_delete(r: &mut Renderer<'_>, clauses: &Clauses) -> Result<()> {
    if !clauses.has_sources() {
        return Err(Error::no_source("delete"));
    }
    let options = r.options();
    r.push(&options.delete_clause);
    r.push(&options.from_fragment);
    r.push_char(' ');
    clauses.from.render(r)?;
    render_where(r, &clauses.where_)?;
    if options.supports_order_by_on_delete {
        render_order(r, &clauses.order)?;
    }
    if options.supports_limit_on_delete {
        render_limit(r, clauses.limit)?;
    }
    render_returning(r, &clauses.returning)
}

pub(crate) fn render_truncate(
    r: &mut Renderer<'_>,
    clauses: &Clauses,
    opts: &TruncateOptions,
) -> Result<()> {
    if !clauses.has_sources() {
        return Err(Error::no_source("truncate"));
    }
    let options = r.options();
    r.push(&options.truncate_clause);
    r.push_char(' ');
    clauses.from.render(r)?;
    if let Some(identity) = opts.identity {
        r.push_char(' ');
        r.push(match identity {
            TruncateIdentity::Restart => "RESTART",
            TruncateIdentity::Continue => "CONTINUE",
        });
        r.push(&options.identity_fragment);
    }
    if opts.cascade {
        r.push(&options.cascade_fragment);
    } else if opts.restrict {
        r.push(&options.restrict_fragment);
    }
    Ok(())
}

fn render_assignments(r: &mut Renderer<'_>, assignments: &[UpdateExpression]) -> Result<()> {
    let separator = &r.options().update_separator;
    for (idx, assignment) in assignments.iter().enumerate() {
        if idx > 0 {
            r.push(separator);
        }
        assignment.render(r)?;
    }
    Ok(())
}

fn render_where(r: &mut Renderer<'_>, where_: &Option<ExpressionList>) -> Result<()> {
    if let Some(conditions) = where_.as_ref().filter(|w| !w.is_empty()) {
        r.push(&r.options().where_fragment);
        conditions.render(r)?;
    }
    Ok(())
}

fn render_order(r: &mut Renderer<'_>, order: &ColumnList) -> Result<()> {
    if !order.is_empty() {
        r.push(&r.options().order_by_fragment);
        order.render(r)?;
    }
    Ok(())
}

fn render_limit(r: &mut Renderer<'_>, limit: Option<Limit>) -> Result<()> {
    let options = r.options();
    match limit {
        None => {}
        Some(Limit::Rows(rows)) => {
            r.push(&options.limit_fragment);
            Value::U64(rows).render(r)?;
        }
        Some(Limit::All) => {
            r.push(&options.limit_fragment);
            r.push(&options.all_literal);
        }
    }
    Ok(())
}

fn render_returning(r: &mut Renderer<'_>, returning: &ColumnList) -> Result<()> {
    if returning.is_empty() {
        return Ok(());
    }
    let options = r.options();
    if !options.supports_returning {
        return Err(Error::unsupported_returning(r.dialect.name()));
    }
    r.push(&options.returning_fragment);
    returning.render(r)
}
