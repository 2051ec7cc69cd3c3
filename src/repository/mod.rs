//! Data-access seams over the remote platform.
//!
//! The traits mirror the operations the platform exposes on objects:
//! querying, single-record retrieval, DML, and metadata introspection.
//! [`rest::RestRepository`] is the production implementation; mocks for
//! downstream tests live behind the `test-mocks` feature.

use serde_json::{Map, Value as Json};

use crate::cursor::QueryCursor;
use crate::domain::query::{Filter, QueryOptions, SelectQuery};
use crate::domain::row::Row;
use crate::domain::schema::{ObjectSchema, ObjectSummary};
use crate::domain::types::{ObjectName, RecordId};
use crate::domain::value::SoqlValue;
use crate::repository::errors::RepositoryResult;

pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod rest;

/// Field values bound for a create or update call, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SaveRow {
    fields: Vec<(String, SoqlValue)>,
}

impl SaveRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<SoqlValue>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    pub fn fields(&self) -> &[(String, SoqlValue)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON object form used by the DML endpoints.
    pub fn to_json(&self) -> Json {
        let mut map = Map::with_capacity(self.fields.len());
        for (field, value) in &self.fields {
            map.insert(field.clone(), value.to_json());
        }
        Json::Object(map)
    }
}

pub trait ObjectReader {
    fn query(
        &self,
        query: &SelectQuery,
        options: &QueryOptions,
    ) -> RepositoryResult<QueryCursor>;

    /// Fetch one record by id. `None` when the record does not exist or
    /// has been deleted.
    fn retrieve(
        &self,
        object: &ObjectName,
        id: &RecordId,
        fields: &[String],
    ) -> RepositoryResult<Option<Row>>;

    fn count(
        &self,
        object: &ObjectName,
        filter: Option<Filter>,
        options: &QueryOptions,
    ) -> RepositoryResult<usize>;
}

pub trait ObjectWriter {
    /// Insert records, returning their new ids in input order.
    fn insert(
        &self,
        object: &ObjectName,
        rows: &[SaveRow],
        options: &QueryOptions,
    ) -> RepositoryResult<Vec<RecordId>>;

    fn update(
        &self,
        object: &ObjectName,
        id: &RecordId,
        values: &SaveRow,
    ) -> RepositoryResult<()>;

    /// Delete records, returning how many were deleted.
    fn delete(
        &self,
        object: &ObjectName,
        ids: &[RecordId],
        options: &QueryOptions,
    ) -> RepositoryResult<usize>;
}

pub trait SchemaReader {
    fn list_objects(&self) -> RepositoryResult<Vec<ObjectSummary>>;
    fn describe(&self, object: &ObjectName) -> RepositoryResult<ObjectSchema>;
}
