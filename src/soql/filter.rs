//! Filter-tree compilation into SOQL condition expressions.
//!
//! A compiled node is either a condition string or one of the two identity
//! outcomes: a node known to match everything (dropped from the statement)
//! or nothing (which compiles the whole query away). Connector groups track
//! how many full/empty children turn the group itself into one of the
//! identities.

use crate::domain::query::{CompareOp, CompareValue, Comparison, Filter, Operand};
use crate::domain::value::SoqlValue;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::soql::compiler::ColumnContext;

#[derive(Clone, Debug, PartialEq)]
pub enum CompiledFilter {
    Sql(String),
    MatchesAll,
    MatchesNone,
}

pub(crate) fn compile_filter(
    filter: &Filter,
    ctx: &ColumnContext<'_>,
) -> RepositoryResult<CompiledFilter> {
    match filter {
        Filter::MatchesAll => Ok(CompiledFilter::MatchesAll),
        Filter::MatchesNone => Ok(CompiledFilter::MatchesNone),
        Filter::Cmp(comparison) => compile_comparison(comparison, ctx),
        Filter::Not(inner) => Ok(match compile_filter(inner, ctx)? {
            CompiledFilter::MatchesAll => CompiledFilter::MatchesNone,
            CompiledFilter::MatchesNone => CompiledFilter::MatchesAll,
            // The parentheses are required when NOT is combined with
            // AND/OR.
            CompiledFilter::Sql(sql) => CompiledFilter::Sql(format!("(NOT ({sql}))")),
        }),
        Filter::And(children) => compile_group(children, true, ctx),
        Filter::Or(children) => compile_group(children, false, ctx),
    }
}

fn compile_group(
    children: &[Filter],
    is_and: bool,
    ctx: &ColumnContext<'_>,
) -> RepositoryResult<CompiledFilter> {
    if children.is_empty() {
        return Ok(CompiledFilter::MatchesAll);
    }

    // AND needs every child to hold and one empty child to fail; OR is the
    // mirror image.
    let (mut full_needed, mut empty_needed) = if is_and {
        (children.len(), 1usize)
    } else {
        (1usize, children.len())
    };

    let mut parts = Vec::new();
    for child in children {
        match compile_filter(child, ctx)? {
            CompiledFilter::MatchesNone => empty_needed -= 1,
            CompiledFilter::MatchesAll => full_needed -= 1,
            CompiledFilter::Sql(sql) => parts.push(sql),
        }
        if empty_needed == 0 {
            return Ok(CompiledFilter::MatchesNone);
        }
        if full_needed == 0 {
            return Ok(CompiledFilter::MatchesAll);
        }
    }

    let connector = if is_and { " AND " } else { " OR " };
    match parts.len() {
        0 => Ok(if is_and {
            CompiledFilter::MatchesAll
        } else {
            CompiledFilter::MatchesNone
        }),
        1 => Ok(CompiledFilter::Sql(parts.pop().unwrap_or_default())),
        _ => Ok(CompiledFilter::Sql(format!("({})", parts.join(connector)))),
    }
}

fn compile_comparison(
    comparison: &Comparison,
    ctx: &ColumnContext<'_>,
) -> RepositoryResult<CompiledFilter> {
    let field = match &comparison.operand {
        Operand::Column(column) => ctx.render(column)?,
        Operand::Aggregate { func, column } => match column {
            Some(column) => format!("{}({})", func.keyword(), ctx.render(column)?),
            None => format!("{}()", func.keyword()),
        },
    };
    match (&comparison.op, &comparison.value) {
        (CompareOp::Eq, CompareValue::One(value)) if value.is_null() => {
            Ok(CompiledFilter::Sql(format!("{field} = null")))
        }
        (CompareOp::NotEq, CompareValue::One(value)) if value.is_null() => {
            Ok(CompiledFilter::Sql(format!("{field} != null")))
        }
        (CompareOp::Eq, CompareValue::One(value)) => {
            Ok(CompiledFilter::Sql(format!("{field} = {}", value.to_literal())))
        }
        (CompareOp::NotEq, CompareValue::One(value)) => Ok(CompiledFilter::Sql(format!(
            "{field} != {}",
            value.to_literal()
        ))),
        (CompareOp::Gt, CompareValue::One(value)) => {
            Ok(CompiledFilter::Sql(format!("{field} > {}", value.to_literal())))
        }
        (CompareOp::GtEq, CompareValue::One(value)) => Ok(CompiledFilter::Sql(format!(
            "{field} >= {}",
            value.to_literal()
        ))),
        (CompareOp::Lt, CompareValue::One(value)) => {
            Ok(CompiledFilter::Sql(format!("{field} < {}", value.to_literal())))
        }
        (CompareOp::LtEq, CompareValue::One(value)) => Ok(CompiledFilter::Sql(format!(
            "{field} <= {}",
            value.to_literal()
        ))),
        (CompareOp::Like, CompareValue::One(SoqlValue::String(pattern))) => Ok(
            CompiledFilter::Sql(format!(
                "{field} LIKE {}",
                SoqlValue::String(pattern.clone()).to_literal()
            )),
        ),
        (CompareOp::Like, _) => Err(RepositoryError::UnsupportedQuery(
            "LIKE requires a string pattern".to_string(),
        )),
        (CompareOp::In, CompareValue::Many(values)) => {
            if values.is_empty() {
                // IN over an empty list can match nothing.
                return Ok(CompiledFilter::MatchesNone);
            }
            Ok(CompiledFilter::Sql(format!(
                "{field} IN ({})",
                render_list(values)
            )))
        }
        (CompareOp::NotIn, CompareValue::Many(values)) => {
            if values.is_empty() {
                return Ok(CompiledFilter::MatchesAll);
            }
            Ok(CompiledFilter::Sql(format!(
                "{field} NOT IN ({})",
                render_list(values)
            )))
        }
        (CompareOp::Includes, CompareValue::Many(values)) => Ok(CompiledFilter::Sql(format!(
            "{field} INCLUDES ({})",
            render_list(values)
        ))),
        (CompareOp::Excludes, CompareValue::Many(values)) => Ok(CompiledFilter::Sql(format!(
            "{field} EXCLUDES ({})",
            render_list(values)
        ))),
        (op, _) => Err(RepositoryError::UnsupportedQuery(format!(
            "operator {op:?} used with the wrong number of values"
        ))),
    }
}

fn render_list(values: &[SoqlValue]) -> String {
    values
        .iter()
        .map(SoqlValue::to_literal)
        .collect::<Vec<_>>()
        .join(", ")
}
