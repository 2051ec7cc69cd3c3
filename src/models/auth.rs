//! Wire payloads for the OAuth token endpoint.

use serde::Deserialize;

/// Successful token exchange.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub instance_url: String,
    pub token_type: String,
    #[serde(default)]
    pub issued_at: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

/// Error body returned by the token endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenError {
    pub error: String,
    #[serde(default)]
    pub error_description: String,
}
