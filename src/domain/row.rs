//! Materialized result rows.

use std::sync::Arc;

use crate::domain::value::SoqlValue;

/// One row of a query result: the cursor's column labels plus the values
/// extracted from a record payload. The labels are shared across all rows
/// of a cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    columns: Arc<Vec<String>>,
    values: Vec<SoqlValue>,
}

impl Row {
    pub fn new(columns: Arc<Vec<String>>, values: Vec<SoqlValue>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SoqlValue> {
        self.values.get(index)
    }

    /// Look a value up by column label. Field names are case-insensitive on
    /// the remote platform, so the lookup is too.
    pub fn get_named(&self, name: &str) -> Option<&SoqlValue> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .and_then(|i| self.values.get(i))
    }

    pub fn values(&self) -> &[SoqlValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<SoqlValue> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        Row::new(
            Arc::new(vec!["Id".to_string(), "Name".to_string()]),
            vec![
                SoqlValue::from("001000000000001AAA"),
                SoqlValue::from("Acme"),
            ],
        )
    }

    #[test]
    fn lookup_by_index_and_name() {
        let row = sample();
        assert_eq!(row.get(1), Some(&SoqlValue::from("Acme")));
        assert_eq!(row.get_named("name"), Some(&SoqlValue::from("Acme")));
        assert_eq!(row.get_named("Missing"), None);
    }
}
