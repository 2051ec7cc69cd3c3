//! Query execution and row materialization.

use std::collections::VecDeque;
use std::sync::Arc;

use serde_json::Value as Json;

use crate::client::{ApiRequest, Transport};
use crate::domain::query::{QueryOptions, SelectQuery};
use crate::domain::row::Row;
use crate::domain::value::SoqlValue;
use crate::models::query::QueryResponse;
use crate::repository::errors::RepositoryResult;
use crate::soql::{Compiled, ColumnExtractor, SoqlCompiler};

/// Cursor over a query result. Pages are fetched lazily: the platform
/// returns a bounded batch of records plus a continuation URL, which the
/// cursor follows when its buffer drains.
pub struct QueryCursor {
    transport: Option<Arc<dyn Transport>>,
    columns: Arc<Vec<String>>,
    extractors: Vec<ColumnExtractor>,
    buffer: VecDeque<Row>,
    next_records_url: Option<String>,
    row_count: usize,
}

impl QueryCursor {
    /// Compile and run a query. A query that can match nothing yields an
    /// empty cursor without touching the network.
    pub fn execute(
        transport: Arc<dyn Transport>,
        query: &SelectQuery,
        options: &QueryOptions,
    ) -> RepositoryResult<Self> {
        let compiled = match SoqlCompiler::new(query, options).compile()? {
            Compiled::Empty => return Ok(Self::empty()),
            Compiled::Query(compiled) => compiled,
        };
        log::debug!("SOQL: {}", compiled.soql);

        let endpoint = if options.tooling_api {
            "tooling/query"
        } else if options.query_all {
            "queryAll"
        } else {
            "query"
        };
        let request = ApiRequest::get(endpoint).query("q", &compiled.soql);
        let response = transport.call(&request)?;
        let payload: QueryResponse = response.json()?;

        let columns = Arc::new(
            compiled
                .columns
                .iter()
                .map(|c| c.label().to_string())
                .collect::<Vec<_>>(),
        );
        let mut cursor = Self {
            transport: Some(transport),
            columns,
            extractors: compiled.columns,
            buffer: VecDeque::new(),
            next_records_url: None,
            row_count: 0,
        };
        cursor.ingest(payload);
        Ok(cursor)
    }

    /// A cursor with no rows, used when compilation proves the result set
    /// empty.
    pub fn empty() -> Self {
        Self {
            transport: None,
            columns: Arc::new(Vec::new()),
            extractors: Vec::new(),
            buffer: VecDeque::new(),
            next_records_url: None,
            row_count: 0,
        }
    }

    /// A cursor over prepared rows; lets mocked repositories hand back
    /// results without a transport.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<SoqlValue>>) -> Self {
        let columns = Arc::new(columns);
        let row_count = rows.len();
        let buffer = rows
            .into_iter()
            .map(|values| Row::new(columns.clone(), values))
            .collect();
        Self {
            transport: None,
            columns,
            extractors: Vec::new(),
            buffer,
            next_records_url: None,
            row_count,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Total number of rows matched by the query, as reported by the
    /// platform. For a bare `COUNT()` query this is the aggregate result.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn fetchone(&mut self) -> RepositoryResult<Option<Row>> {
        if self.buffer.is_empty() {
            self.fetch_next_page()?;
        }
        Ok(self.buffer.pop_front())
    }

    pub fn fetchmany(&mut self, size: usize) -> RepositoryResult<Vec<Row>> {
        let mut rows = Vec::with_capacity(size);
        while rows.len() < size {
            match self.fetchone()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(rows)
    }

    pub fn fetchall(&mut self) -> RepositoryResult<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetchone()? {
            rows.push(row);
        }
        Ok(rows)
    }

    fn ingest(&mut self, payload: QueryResponse) {
        self.row_count = payload.total_size;
        self.next_records_url = if payload.done {
            None
        } else {
            payload.next_records_url
        };
        let rows: Vec<Row> = payload
            .records
            .iter()
            .map(|record| self.materialize(record))
            .collect();
        self.buffer.extend(rows);
    }

    fn fetch_next_page(&mut self) -> RepositoryResult<()> {
        let Some(url) = self.next_records_url.take() else {
            return Ok(());
        };
        let Some(transport) = self.transport.clone() else {
            return Ok(());
        };
        log::debug!("fetching next page {url}");
        let response = transport.call(&ApiRequest::get(url))?;
        let payload: QueryResponse = response.json()?;
        self.ingest(payload);
        Ok(())
    }

    fn materialize(&self, record: &Json) -> Row {
        let values = self
            .extractors
            .iter()
            .map(|extractor| extract(record, extractor))
            .collect();
        Row::new(self.columns.clone(), values)
    }
}

impl Iterator for QueryCursor {
    type Item = RepositoryResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.fetchone().transpose()
    }
}

/// Pull one column out of a record payload. Parent fields live in nested
/// objects keyed by relationship name; a null link anywhere along the path
/// makes the whole column null.
fn extract(record: &Json, extractor: &ColumnExtractor) -> SoqlValue {
    match extractor {
        ColumnExtractor::Path {
            relationships,
            field,
            ..
        } => {
            let mut current = record;
            for relationship in relationships {
                match current.get(relationship) {
                    Some(next) if !next.is_null() => current = next,
                    _ => return SoqlValue::Null,
                }
            }
            current
                .get(field)
                .map(SoqlValue::from_json)
                .unwrap_or(SoqlValue::Null)
        }
        ColumnExtractor::Aggregate { key, .. } => record
            .get(key)
            .map(SoqlValue::from_json)
            .unwrap_or(SoqlValue::Null),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::soql::ColumnExtractor;

    #[test]
    fn extracts_nested_parent_fields() {
        let record = json!({
            "attributes": {"type": "Contact"},
            "LastName": "Rees",
            "Account": {"attributes": {"type": "Account"}, "Name": "Acme"}
        });
        let extractor = ColumnExtractor::Path {
            relationships: vec!["Account".to_string()],
            field: "Name".to_string(),
            label: "Account.Name".to_string(),
        };
        assert_eq!(extract(&record, &extractor), SoqlValue::from("Acme"));
    }

    #[test]
    fn null_parent_links_yield_null() {
        let record = json!({"LastName": "Rees", "Account": null});
        let extractor = ColumnExtractor::Path {
            relationships: vec!["Account".to_string()],
            field: "Name".to_string(),
            label: "Account.Name".to_string(),
        };
        assert_eq!(extract(&record, &extractor), SoqlValue::Null);
    }

    #[test]
    fn aggregate_columns_read_their_key() {
        let record = json!({"expr0": 7});
        let extractor = ColumnExtractor::Aggregate {
            key: "expr0".to_string(),
            label: "expr0".to_string(),
        };
        assert_eq!(extract(&record, &extractor), SoqlValue::Integer(7));
    }

    #[test]
    fn from_rows_cursor_drains_in_order() {
        let mut cursor = QueryCursor::from_rows(
            vec!["Name".to_string()],
            vec![
                vec![SoqlValue::from("first")],
                vec![SoqlValue::from("second")],
            ],
        );
        assert_eq!(cursor.row_count(), 2);
        let names: Vec<_> = cursor
            .fetchall()
            .unwrap()
            .into_iter()
            .map(|row| row.into_values().remove(0))
            .collect();
        assert_eq!(
            names,
            vec![SoqlValue::from("first"), SoqlValue::from("second")]
        );
    }
}
