//! Session establishment against the OAuth token endpoint.
//!
//! A session (access token + instance URL) is obtained through the
//! username-password flow and cached for reuse across requests. The broker
//! re-authenticates only when asked to, which the transport does once after
//! an expired-session response.

use std::sync::Mutex;

use crate::models::auth::{TokenError, TokenResponse};
use crate::models::config::AdapterConfig;
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// An authenticated session with the remote platform.
#[derive(Clone, Debug)]
pub struct Session {
    pub access_token: String,
    pub instance_url: String,
}

/// Owns the credentials and the cached session.
pub struct SessionBroker {
    config: AdapterConfig,
    http: reqwest::blocking::Client,
    session: Mutex<Option<Session>>,
}

impl SessionBroker {
    /// Create a broker, authenticating eagerly unless the configuration
    /// asks for a deferred connection.
    pub fn connect(config: AdapterConfig) -> RepositoryResult<Self> {
        let http = reqwest::blocking::Client::builder().build()?;
        let broker = Self {
            config,
            http,
            session: Mutex::new(None),
        };
        if !broker.config.lazy_connect {
            broker.session()?;
        }
        Ok(broker)
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// The cached session, authenticating first if none is held.
    pub fn session(&self) -> RepositoryResult<Session> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| RepositoryError::Unexpected("session lock poisoned".to_string()))?;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }
        let session = self.authenticate()?;
        *guard = Some(session.clone());
        Ok(session)
    }

    /// Drop the cached session so the next call re-authenticates.
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.session.lock() {
            *guard = None;
        }
    }

    fn authenticate(&self) -> RepositoryResult<Session> {
        let url = format!(
            "{}/services/oauth2/token",
            self.config.host.trim_end_matches('/')
        );
        log::debug!("requesting access token from {url}");
        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "password"),
                ("client_id", self.config.consumer_key.as_str()),
                ("client_secret", self.config.consumer_secret.as_str()),
                ("username", self.config.user.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .json::<TokenError>()
                .map(|e| format!("{}: {}", e.error, e.error_description))
                .unwrap_or_else(|_| format!("token request failed with status {status}"));
            return Err(RepositoryError::Auth(detail));
        }

        let token: TokenResponse = response.json()?;
        log::info!(
            "authenticated {} at {}",
            self.config.user,
            token.instance_url
        );
        Ok(Session {
            access_token: token.access_token,
            instance_url: token.instance_url,
        })
    }
}
