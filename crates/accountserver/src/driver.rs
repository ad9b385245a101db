//! The `accountserver` backend driver.
//!
//! Opening a session runs three steps in order: the session parameters are
//! checked against the approved connection profiles, the account server is
//! asked to verify the credentials, and the user root is derived from the
//! path template. Only when all three succeed is a [`ScopedFs`] handed out.

use backend::{Backend, BackendError, Driver, FieldType, Form, FormElement, Params, Result};
use tracing::{info, warn};

use crate::auth::{AccountClient, SessionParams};
use crate::config::{Config, ConnectionProfile};
use crate::files::ScopedFs;
use crate::validator::check_params;
use crate::TYPE_NAME;

/// Driver for account-server authenticated storage.
#[derive(Debug, Clone)]
pub struct AccountServer {
    profiles: Vec<ConnectionProfile>,
    client: AccountClient,
}

impl AccountServer {
    /// Create a driver from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            profiles: config.profiles_for(TYPE_NAME).cloned().collect(),
            client: AccountClient::new(&config.http)?,
        })
    }

    /// Connection profiles this driver validates against.
    pub fn profiles(&self) -> &[ConnectionProfile] {
        &self.profiles
    }

    /// Check session parameters without contacting the account server.
    pub fn validate(&self, params: &Params) -> Result<()> {
        check_params(params, &self.profiles)
    }

    /// Open a session, returning the concrete scoped backend.
    pub fn bind(&self, params: &Params) -> Result<ScopedFs> {
        self.validate(params)?;

        let session = SessionParams::from_params(params);
        let authenticated =
            self.client
                .check_auth(&session.url, &session.username, &session.password)?;
        if !authenticated {
            warn!("[{}] Rejected credentials for {}", TYPE_NAME, session.username);
            return Err(BackendError::AuthenticationFailed);
        }

        let root = session.root_path();
        info!(
            "[{}] Authenticate {} to {}",
            TYPE_NAME,
            session.username,
            root.display()
        );

        Ok(ScopedFs::new(root))
    }
}

impl Driver for AccountServer {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn init(&self, params: &Params) -> Result<Box<dyn Backend>> {
        Ok(Box::new(self.bind(params)?))
    }

    fn login_form(&self) -> Form {
        login_form()
    }
}

/// The login form for this backend.
pub fn login_form() -> Form {
    Form::new(vec![
        FormElement::new("type", FieldType::Hidden).value(TYPE_NAME),
        FormElement::new("username", FieldType::Text)
            .description("Username")
            .placeholder("Username"),
        FormElement::new("password", FieldType::Password)
            .description("Password")
            .placeholder("Password"),
        FormElement::new("advanced", FieldType::Enable)
            .description("Advanced")
            .placeholder("Advanced")
            .target(["path_template", "url"]),
        FormElement::new("path_template", FieldType::Text)
            .id("path_template")
            .description("Path")
            .placeholder("/tmp/%{username}"),
        FormElement::new("url", FieldType::Text)
            .id("url")
            .description("Accountserver HTTP API Address")
            .placeholder("http://accountserver:8000"),
    ])
}
