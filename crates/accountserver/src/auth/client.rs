//! HTTP client for the account server's `checkauth` call.
//!
//! The account server answers a form-encoded POST carrying `req=checkauth`,
//! `user` and `pass` with a JSON literal `true` or `false`. Anything else in
//! the body is a decode failure, never a rejected login.

use backend::{BackendError, Result};
use reqwest::blocking::Client;

use crate::config::HttpConfig;

/// Request kind sent in the `req` form field.
const CHECKAUTH: &str = "checkauth";

/// Blocking account-server client.
///
/// The client performs exactly one request per call and never retries;
/// timeouts come from [`HttpConfig`].
#[derive(Debug, Clone)]
pub struct AccountClient {
    client: Client,
}

impl AccountClient {
    /// Create a client from the HTTP configuration.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(BackendError::transport)?;
        Ok(Self { client })
    }

    /// Ask the account server at `url` whether the credentials are valid.
    ///
    /// Returns `Ok(false)` only when the server answered `false`.
    pub fn check_auth(&self, url: &str, username: &str, password: &str) -> Result<bool> {
        let response = self
            .client
            .post(url)
            .form(&[("req", CHECKAUTH), ("user", username), ("pass", password)])
            .send()
            .map_err(BackendError::transport)?;

        let body = response.bytes().map_err(BackendError::transport)?;
        parse_auth_response(&String::from_utf8_lossy(&body))
    }
}

/// Decode an account-server response body as a JSON boolean.
pub fn parse_auth_response(body: &str) -> Result<bool> {
    serde_json::from_str::<bool>(body).map_err(|source| BackendError::Decode {
        body: body.to_string(),
        source,
    })
}
