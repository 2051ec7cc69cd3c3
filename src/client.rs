//! HTTP transport for the REST API.
//!
//! [`Transport`] is the seam between repository logic and HTTP; the
//! production implementation is [`RestClient`], tests substitute scripted
//! transports.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use url::Url;

use crate::auth::{Session, SessionBroker};
use crate::models::config::AdapterConfig;
use crate::models::dml::ApiErrorBody;
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Error code the platform reports for an expired or revoked token.
const INVALID_SESSION_ID: &str = "INVALID_SESSION_ID";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        write!(f, "{name}")
    }
}

/// A request against the REST API. `path` is relative to the versioned data
/// root, or instance-absolute when it starts with `/` (next-page URLs come
/// back in that form).
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Json>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Json) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>, body: Json) -> Self {
        Self {
            method: Method::Patch,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Decoded response: status plus the JSON body when one was returned
/// (DML calls answer 204 with no body).
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Json>,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> RepositoryResult<T> {
        let body = self.body.clone().ok_or_else(|| {
            RepositoryError::Serialization("response has no body".to_string())
        })?;
        Ok(serde_json::from_value(body)?)
    }
}

/// Boundary between repository logic and HTTP.
pub trait Transport: Send + Sync {
    fn call(&self, request: &ApiRequest) -> RepositoryResult<ApiResponse>;
}

/// Production transport over `reqwest`.
pub struct RestClient {
    http: reqwest::blocking::Client,
    broker: SessionBroker,
    api_version: String,
}

impl RestClient {
    pub fn new(config: AdapterConfig) -> RepositoryResult<Self> {
        let http = reqwest::blocking::Client::builder().build()?;
        let api_version = config.api_version.clone();
        let broker = SessionBroker::connect(config)?;
        Ok(Self {
            http,
            broker,
            api_version,
        })
    }

    pub fn broker(&self) -> &SessionBroker {
        &self.broker
    }

    fn url(&self, session: &Session, request: &ApiRequest) -> RepositoryResult<Url> {
        let base = Url::parse(&session.instance_url)?;
        let full_path = if request.path.starts_with('/') {
            request.path.clone()
        } else {
            format!("/services/data/v{}/{}", self.api_version, request.path)
        };
        let mut url = base.join(&full_path)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    fn send(
        &self,
        session: &Session,
        request: &ApiRequest,
    ) -> RepositoryResult<reqwest::blocking::Response> {
        let url = self.url(session, request)?;
        log::debug!("{} {}", request.method, url);
        let builder = match request.method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Patch => self.http.patch(url),
            Method::Delete => self.http.delete(url),
        };
        let builder = builder.bearer_auth(&session.access_token);
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };
        Ok(builder.send()?)
    }

    fn finish(response: reqwest::blocking::Response) -> RepositoryResult<ApiResponse> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::read_error(response));
        }
        let body = if status.as_u16() == 204 {
            None
        } else {
            let text = response.text()?;
            if text.trim().is_empty() {
                None
            } else {
                Some(serde_json::from_str(&text)?)
            }
        };
        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// Map an error response onto the repository error taxonomy. Most
    /// endpoints answer with an array of `{errorCode, message}` entries.
    fn read_error(response: reqwest::blocking::Response) -> RepositoryError {
        let status = response.status();
        let parsed: Option<Vec<ApiErrorBody>> = response.json().ok();
        match parsed.and_then(|mut errors| {
            if errors.is_empty() {
                None
            } else {
                Some(errors.remove(0))
            }
        }) {
            Some(error) if status.as_u16() == 404 => {
                log::debug!("not found: {}", error.message);
                RepositoryError::NotFound
            }
            Some(error) => RepositoryError::Api {
                code: error.error_code,
                message: error.message,
            },
            None if status.as_u16() == 404 => RepositoryError::NotFound,
            None => RepositoryError::Unexpected(format!("request failed with status {status}")),
        }
    }
}

impl Transport for RestClient {
    fn call(&self, request: &ApiRequest) -> RepositoryResult<ApiResponse> {
        let session = self.broker.session()?;
        let response = self.send(&session, request)?;

        if response.status().as_u16() == 401 {
            let error = Self::read_error(response);
            let expired = matches!(
                &error,
                RepositoryError::Api { code, .. } if code == INVALID_SESSION_ID
            );
            if !expired {
                return Err(RepositoryError::Auth(error.to_string()));
            }
            // Expired token: refresh the session and retry once.
            log::info!("session expired, re-authenticating");
            self.broker.invalidate();
            let session = self.broker.session()?;
            let response = self.send(&session, request)?;
            return Self::finish(response);
        }

        Self::finish(response)
    }
}
