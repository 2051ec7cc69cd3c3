//! REST implementation of the repository traits.

use std::sync::Arc;

use serde_json::{Value as Json, json};

use crate::client::{ApiRequest, RestClient, Transport};
use crate::cursor::QueryCursor;
use crate::domain::query::{Filter, QueryOptions, SelectItem, SelectQuery};
use crate::domain::row::Row;
use crate::domain::schema::{ObjectSchema, ObjectSummary};
use crate::domain::types::{ObjectName, RecordId};
use crate::domain::value::SoqlValue;
use crate::introspect;
use crate::models::describe::{DescribeGlobalResponse, SObjectDescribe};
use crate::models::dml::SaveResult;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ObjectReader, ObjectWriter, SaveRow, SchemaReader};

/// Repository over the REST transport.
#[derive(Clone)]
pub struct RestRepository {
    transport: Arc<dyn Transport>,
}

impl RestRepository {
    /// Connect with the given configuration. Authentication happens here
    /// unless the configuration defers it.
    pub fn new(config: crate::models::config::AdapterConfig) -> RepositoryResult<Self> {
        Ok(Self {
            transport: Arc::new(RestClient::new(config)?),
        })
    }

    /// Build a repository over an existing transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn sobject_path(object: &ObjectName, id: &RecordId) -> String {
        format!("sobjects/{object}/{id}")
    }

    fn save_error(results: &[SaveResult]) -> Option<RepositoryError> {
        results
            .iter()
            .find(|r| !r.success)
            .map(|failed| match failed.errors.first() {
                Some(error) => RepositoryError::Api {
                    code: error.status_code.clone(),
                    message: error.message.clone(),
                },
                None => RepositoryError::Unexpected("DML call failed".to_string()),
            })
    }
}

impl ObjectReader for RestRepository {
    fn query(
        &self,
        query: &SelectQuery,
        options: &QueryOptions,
    ) -> RepositoryResult<QueryCursor> {
        QueryCursor::execute(self.transport.clone(), query, options)
    }

    fn retrieve(
        &self,
        object: &ObjectName,
        id: &RecordId,
        fields: &[String],
    ) -> RepositoryResult<Option<Row>> {
        let mut request = ApiRequest::get(Self::sobject_path(object, id));
        if !fields.is_empty() {
            request = request.query("fields", fields.join(","));
        }
        let record: Json = match self.transport.call(&request) {
            Ok(response) => response.json()?,
            Err(RepositoryError::NotFound) => return Ok(None),
            Err(err) => {
                log::error!("failed to retrieve {object} {id}: {err}");
                return Err(err);
            }
        };

        let columns: Vec<String> = if fields.is_empty() {
            record
                .as_object()
                .map(|map| {
                    map.keys()
                        .filter(|k| k.as_str() != "attributes")
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        } else {
            fields.to_vec()
        };
        let values = columns
            .iter()
            .map(|field| {
                record
                    .get(field)
                    .map(SoqlValue::from_json)
                    .unwrap_or(SoqlValue::Null)
            })
            .collect();
        Ok(Some(Row::new(Arc::new(columns), values)))
    }

    fn count(
        &self,
        object: &ObjectName,
        filter: Option<Filter>,
        options: &QueryOptions,
    ) -> RepositoryResult<usize> {
        let mut query = SelectQuery::new(object.clone()).select(SelectItem::count());
        if let Some(filter) = filter {
            query = query.filter(filter);
        }
        let cursor = QueryCursor::execute(self.transport.clone(), &query, options)?;
        Ok(cursor.row_count())
    }
}

impl ObjectWriter for RestRepository {
    fn insert(
        &self,
        object: &ObjectName,
        rows: &[SaveRow],
        options: &QueryOptions,
    ) -> RepositoryResult<Vec<RecordId>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // A lone record without an atomicity requirement takes the simple
        // endpoint; everything else goes through the composite call.
        if rows.len() == 1 && options.all_or_none.is_none() {
            let request = ApiRequest::post(format!("sobjects/{object}"), rows[0].to_json());
            let response = self.transport.call(&request).inspect_err(|err| {
                log::error!("failed to insert into {object}: {err}");
            })?;
            let result: SaveResult = response.json()?;
            if let Some(err) = Self::save_error(std::slice::from_ref(&result)) {
                return Err(err);
            }
            let id = result.id.ok_or_else(|| {
                RepositoryError::Unexpected("insert result carries no id".to_string())
            })?;
            return Ok(vec![RecordId::new(id)?]);
        }

        let records: Vec<Json> = rows
            .iter()
            .map(|row| {
                let mut record = row.to_json();
                if let Some(map) = record.as_object_mut() {
                    map.insert(
                        "attributes".to_string(),
                        json!({"type": object.as_str()}),
                    );
                }
                record
            })
            .collect();
        let body = json!({
            "allOrNone": options.all_or_none.unwrap_or(false),
            "records": records,
        });
        let response = self
            .transport
            .call(&ApiRequest::post("composite/sobjects", body))
            .inspect_err(|err| {
                log::error!("failed to insert into {object}: {err}");
            })?;
        let results: Vec<SaveResult> = response.json()?;
        if let Some(err) = Self::save_error(&results) {
            return Err(err);
        }
        results
            .into_iter()
            .map(|result| {
                let id = result.id.ok_or_else(|| {
                    RepositoryError::Unexpected("insert result carries no id".to_string())
                })?;
                Ok(RecordId::new(id)?)
            })
            .collect()
    }

    fn update(
        &self,
        object: &ObjectName,
        id: &RecordId,
        values: &SaveRow,
    ) -> RepositoryResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        let request = ApiRequest::patch(Self::sobject_path(object, id), values.to_json());
        self.transport.call(&request).inspect_err(|err| {
            log::error!("failed to update {object} {id}: {err}");
        })?;
        Ok(())
    }

    fn delete(
        &self,
        object: &ObjectName,
        ids: &[RecordId],
        options: &QueryOptions,
    ) -> RepositoryResult<usize> {
        match ids {
            [] => Ok(0),
            [id] if options.all_or_none.is_none() => {
                let request = ApiRequest::delete(Self::sobject_path(object, id));
                match self.transport.call(&request) {
                    Ok(_) => Ok(1),
                    Err(RepositoryError::NotFound) => Ok(0),
                    Err(err) => {
                        log::error!("failed to delete {object} {id}: {err}");
                        Err(err)
                    }
                }
            }
            ids => {
                let joined = ids
                    .iter()
                    .map(RecordId::as_str)
                    .collect::<Vec<_>>()
                    .join(",");
                let request = ApiRequest::delete("composite/sobjects")
                    .query("ids", joined)
                    .query(
                        "allOrNone",
                        options.all_or_none.unwrap_or(false).to_string(),
                    );
                let response = self.transport.call(&request).inspect_err(|err| {
                    log::error!("failed to delete from {object}: {err}");
                })?;
                let results: Vec<SaveResult> = response.json()?;
                if options.all_or_none == Some(true)
                    && let Some(err) = Self::save_error(&results)
                {
                    return Err(err);
                }
                Ok(results.iter().filter(|r| r.success).count())
            }
        }
    }
}

impl SchemaReader for RestRepository {
    fn list_objects(&self) -> RepositoryResult<Vec<ObjectSummary>> {
        let response = self.transport.call(&ApiRequest::get("sobjects"))?;
        let listing: DescribeGlobalResponse = response.json()?;
        Ok(listing
            .sobjects
            .iter()
            .map(introspect::object_summary)
            .collect())
    }

    fn describe(&self, object: &ObjectName) -> RepositoryResult<ObjectSchema> {
        let response = self
            .transport
            .call(&ApiRequest::get(format!("sobjects/{object}/describe")))
            .inspect_err(|err| {
                log::error!("failed to describe {object}: {err}");
            })?;
        let describe: SObjectDescribe = response.json()?;
        Ok(introspect::object_schema(&describe))
    }
}
