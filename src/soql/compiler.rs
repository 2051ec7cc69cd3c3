//! SOQL statement generation from the relational query description.

use crate::domain::query::{
    AggregateFunc, ColumnRef, QueryOptions, SelectItem, SelectQuery,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::soql::filter::{CompiledFilter, compile_filter};

/// Objects that reject root-prefixed field names and always need minimal
/// aliases.
pub const OBJECTS_NEEDING_MINIMAL_ALIASES: &[&str] = &[
    "ContentDocumentLink",
    "ContentFolderItem",
    "ContentFolderMember",
    "IdeaComment",
    "Vote",
];

/// Derive the relationship name used to traverse a lookup field: a custom
/// field `Foo__c` becomes `Foo__r`, a standard field `FooId` becomes `Foo`.
pub fn relationship_name(lookup_field: &str) -> RepositoryResult<String> {
    if let Some(stem) = lookup_field.strip_suffix("__c") {
        if stem.is_empty() {
            return Err(RepositoryError::UnsupportedQuery(format!(
                "field {lookup_field:?} is not a lookup field"
            )));
        }
        return Ok(format!("{stem}__r"));
    }
    match lookup_field.strip_suffix("Id") {
        Some(stem) if !stem.is_empty() => Ok(stem.to_string()),
        _ => Err(RepositoryError::UnsupportedQuery(format!(
            "field {lookup_field:?} is not a lookup field"
        ))),
    }
}

/// Rendering context for column references: how the root object and parent
/// relationship paths appear in the generated statement.
pub(crate) struct ColumnContext<'a> {
    root: &'a str,
    minimal: bool,
}

impl<'a> ColumnContext<'a> {
    pub(crate) fn new(root: &'a str, options: &QueryOptions) -> Self {
        let minimal = options.minimal_aliases
            || options.tooling_api
            || OBJECTS_NEEDING_MINIMAL_ALIASES.contains(&root);
        Self { root, minimal }
    }

    /// Render a column as a dotted relationship path.
    pub(crate) fn render(&self, column: &ColumnRef) -> RepositoryResult<String> {
        let mut segments: Vec<String> = Vec::with_capacity(column.path.len() + 2);
        if !self.minimal {
            segments.push(self.root.to_string());
        }
        for lookup in &column.path {
            segments.push(relationship_name(lookup)?);
        }
        segments.push(column.name.clone());
        Ok(segments.join("."))
    }
}

/// Extraction plan for one select-list entry, consumed by the cursor when
/// materializing rows.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnExtractor {
    /// Walk nested parent objects by relationship name, then read the field.
    Path {
        relationships: Vec<String>,
        field: String,
        label: String,
    },
    /// Aggregate result column, read by alias or the platform's positional
    /// `exprN` name.
    Aggregate { key: String, label: String },
}

impl ColumnExtractor {
    pub fn label(&self) -> &str {
        match self {
            ColumnExtractor::Path { label, .. } => label,
            ColumnExtractor::Aggregate { label, .. } => label,
        }
    }
}

/// A query rendered into SOQL, together with its extraction plan.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledQuery {
    pub soql: String,
    pub columns: Vec<ColumnExtractor>,
}

/// Compilation result. `Empty` marks a query that can match nothing; it is
/// never sent to the platform.
#[derive(Clone, Debug, PartialEq)]
pub enum Compiled {
    Query(CompiledQuery),
    Empty,
}

/// Compiles one [`SelectQuery`] under a set of [`QueryOptions`].
pub struct SoqlCompiler<'a> {
    query: &'a SelectQuery,
    options: &'a QueryOptions,
}

impl<'a> SoqlCompiler<'a> {
    pub fn new(query: &'a SelectQuery, options: &'a QueryOptions) -> Self {
        Self { query, options }
    }

    pub fn compile(&self) -> RepositoryResult<Compiled> {
        let query = self.query;
        if query.columns.is_empty() {
            return Err(RepositoryError::UnsupportedQuery(
                "select list is empty".to_string(),
            ));
        }
        if query.limit == Some(0) {
            return Ok(Compiled::Empty);
        }

        let ctx = ColumnContext::new(query.object.as_str(), self.options);

        let where_clause = match &query.filter {
            Some(filter) => match compile_filter(filter, &ctx)? {
                CompiledFilter::MatchesNone => return Ok(Compiled::Empty),
                CompiledFilter::MatchesAll => None,
                CompiledFilter::Sql(sql) => Some(sql),
            },
            None => None,
        };

        let (out_cols, extractors) = self.select_list(&ctx)?;

        let mut result = vec!["SELECT".to_string(), out_cols.join(", ")];
        result.push("FROM".to_string());
        result.push(query.object.to_string());

        if let Some(sql) = where_clause {
            result.push(format!("WHERE {sql}"));
        }

        if !query.group_by.is_empty() {
            let grouping = query
                .group_by
                .iter()
                .map(|c| ctx.render(c))
                .collect::<RepositoryResult<Vec<_>>>()?;
            result.push(format!("GROUP BY {}", grouping.join(", ")));
        }

        if let Some(having) = &query.having {
            match compile_filter(having, &ctx)? {
                CompiledFilter::MatchesNone => return Ok(Compiled::Empty),
                CompiledFilter::MatchesAll => {}
                CompiledFilter::Sql(sql) => result.push(format!("HAVING {sql}")),
            }
        }

        if !query.order_by.is_empty() {
            let ordering = query
                .order_by
                .iter()
                .map(|order| {
                    let field = ctx.render(&order.column)?;
                    let direction = if order.descending { "DESC" } else { "ASC" };
                    Ok(match order.nulls {
                        Some(crate::domain::query::NullsOrder::First) => {
                            format!("{field} {direction} NULLS FIRST")
                        }
                        Some(crate::domain::query::NullsOrder::Last) => {
                            format!("{field} {direction} NULLS LAST")
                        }
                        None => format!("{field} {direction}"),
                    })
                })
                .collect::<RepositoryResult<Vec<_>>>()?;
            result.push(format!("ORDER BY {}", ordering.join(", ")));
        }

        if let Some(limit) = query.limit {
            result.push(format!("LIMIT {limit}"));
        }
        if let Some(offset) = query.offset {
            if offset > 0 {
                result.push(format!("OFFSET {offset}"));
            }
        }

        Ok(Compiled::Query(CompiledQuery {
            soql: result.join(" "),
            columns: extractors,
        }))
    }

    fn select_list(
        &self,
        ctx: &ColumnContext<'_>,
    ) -> RepositoryResult<(Vec<String>, Vec<ColumnExtractor>)> {
        let mut out_cols = Vec::with_capacity(self.query.columns.len());
        let mut extractors = Vec::with_capacity(self.query.columns.len());
        let mut unaliased = 0usize;

        for item in &self.query.columns {
            match item {
                SelectItem::Column(column) => {
                    out_cols.push(ctx.render(column)?);
                    let relationships = column
                        .path
                        .iter()
                        .map(|lookup| relationship_name(lookup))
                        .collect::<RepositoryResult<Vec<_>>>()?;
                    let label = if relationships.is_empty() {
                        column.name.clone()
                    } else {
                        format!("{}.{}", relationships.join("."), column.name)
                    };
                    extractors.push(ColumnExtractor::Path {
                        relationships,
                        field: column.name.clone(),
                        label,
                    });
                }
                SelectItem::Aggregate {
                    func,
                    column,
                    alias,
                } => {
                    let rendered_arg = match column {
                        Some(column) => ctx.render(column)?,
                        None if *func == AggregateFunc::Count => String::new(),
                        None => {
                            return Err(RepositoryError::UnsupportedQuery(format!(
                                "{} requires a field", func.keyword()
                            )));
                        }
                    };
                    let expr = format!("{}({rendered_arg})", func.keyword());
                    match alias {
                        Some(alias) => {
                            // Aggregate aliases render without AS.
                            out_cols.push(format!("{expr} {alias}"));
                            extractors.push(ColumnExtractor::Aggregate {
                                key: alias.clone(),
                                label: alias.clone(),
                            });
                        }
                        None => {
                            out_cols.push(expr);
                            // Bare COUNT() yields no record column; the row
                            // count arrives as the payload total size.
                            if !(*func == AggregateFunc::Count && column.is_none()) {
                                let key = format!("expr{unaliased}");
                                extractors.push(ColumnExtractor::Aggregate {
                                    key: key.clone(),
                                    label: key,
                                });
                                unaliased += 1;
                            }
                        }
                    }
                }
            }
        }
        Ok((out_cols, extractors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_lookup_fields_strip_the_id_suffix() {
        assert_eq!(relationship_name("AccountId").unwrap(), "Account");
        assert_eq!(relationship_name("OwnerId").unwrap(), "Owner");
    }

    #[test]
    fn custom_lookup_fields_swap_the_suffix() {
        assert_eq!(relationship_name("Parent__c").unwrap(), "Parent__r");
    }

    #[test]
    fn non_lookup_fields_are_rejected() {
        assert!(matches!(
            relationship_name("Name"),
            Err(RepositoryError::UnsupportedQuery(_))
        ));
        assert!(matches!(
            relationship_name("Id"),
            Err(RepositoryError::UnsupportedQuery(_))
        ));
        assert!(matches!(
            relationship_name("__c"),
            Err(RepositoryError::UnsupportedQuery(_))
        ));
    }
}
