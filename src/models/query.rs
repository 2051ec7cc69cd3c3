//! Wire payloads for the query endpoints.

use serde::Deserialize;
use serde_json::Value as Json;

/// One page of a query result. Records stay raw JSON; the cursor walks them
/// by relationship path when materializing rows.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub total_size: usize,
    pub done: bool,
    #[serde(default)]
    pub next_records_url: Option<String>,
    #[serde(default)]
    pub records: Vec<Json>,
}
