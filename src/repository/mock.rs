//! Mock repository implementations for isolating downstream code in tests.

use mockall::mock;

use crate::cursor::QueryCursor;
use crate::domain::query::{Filter, QueryOptions, SelectQuery};
use crate::domain::row::Row;
use crate::domain::schema::{ObjectSchema, ObjectSummary};
use crate::domain::types::{ObjectName, RecordId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ObjectReader, ObjectWriter, SaveRow, SchemaReader};

mock! {
    pub Repository {}

    impl ObjectReader for Repository {
        fn query(
            &self,
            query: &SelectQuery,
            options: &QueryOptions,
        ) -> RepositoryResult<QueryCursor>;
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

    impl ObjectWriter for Repository {
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
        fn delete(
            &self,
            object: &ObjectName,
            ids: &[RecordId],
            options: &QueryOptions,
        ) -> RepositoryResult<usize>;
    }

    impl SchemaReader for Repository {
        fn list_objects(&self) -> RepositoryResult<Vec<ObjectSummary>>;
        fn describe(&self, object: &ObjectName) -> RepositoryResult<ObjectSchema>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::SoqlValue;

    /// Confirms the mock satisfies the reader seam the way downstream test
    /// suites consume it.
    #[test]
    fn mocked_counts_check_their_arguments() {
        let mut repo = MockRepository::new();
        repo.expect_count()
            .withf(|object, _, _| object.as_str() == "Account")
            .times(1)
            .returning(|_, _, _| Ok(3));

        let object = ObjectName::new("Account").unwrap();
        assert_eq!(
            repo.count(&object, None, &QueryOptions::default()).unwrap(),
            3
        );
    }

    #[test]
    fn mocked_queries_return_prepared_cursors() {
        let mut repo = MockRepository::new();
        repo.expect_query().returning(|_, _| {
            Ok(QueryCursor::from_rows(
                vec!["Name".to_string()],
                vec![vec![SoqlValue::from("Acme")]],
            ))
        });

        let query = SelectQuery::new(ObjectName::new("Account").unwrap()).column("Name");
        let mut cursor = repo.query(&query, &QueryOptions::default()).unwrap();
        let row = cursor.fetchone().unwrap().unwrap();
        assert_eq!(row.get_named("Name"), Some(&SoqlValue::from("Acme")));
    }
}
