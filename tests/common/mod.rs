//! Shared helpers for integration tests.

use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex};

use sfdc_bridge::client::{ApiRequest, ApiResponse, Transport};
use sfdc_bridge::repository::errors::{RepositoryError, RepositoryResult};

/// Long-running cases only run when `SLOW_TESTS` asks for them.
#[allow(dead_code)]
pub fn slow_tests_enabled() -> bool {
    env::var("SLOW_TESTS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Whether the environment carries credentials for a real org.
#[allow(dead_code)]
pub fn live_credentials_present() -> bool {
    ["SF_CONSUMER_KEY", "SF_CONSUMER_SECRET", "SF_USER", "SF_PASSWORD"]
        .iter()
        .all(|var| env::var(var).is_ok())
}

/// Transport replaying a prepared list of responses while recording every
/// request it sees.
#[allow(dead_code)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<RepositoryResult<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(responses: Vec<RepositoryResult<ApiResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Successful 200 responses with the given bodies.
    pub fn replying(bodies: Vec<serde_json::Value>) -> Arc<Self> {
        Self::new(
            bodies
                .into_iter()
                .map(|body| {
                    Ok(ApiResponse {
                        status: 200,
                        body: Some(body),
                    })
                })
                .collect(),
        )
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn call(&self, request: &ApiRequest) -> RepositoryResult<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(RepositoryError::Unexpected(
                    "no scripted response left".to_string(),
                ))
            })
    }
}
