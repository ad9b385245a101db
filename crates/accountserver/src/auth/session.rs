//! Typed session parameters and root path resolution.

use std::fmt;
use std::path::PathBuf;

use backend::Params;

/// Placeholder substituted with the username in a path template.
pub const USERNAME_PLACEHOLDER: &str = "%{username}";

/// Known session fields, destructured once the parameters are validated.
///
/// Absent parameters are read as empty strings.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionParams {
    pub username: String,
    pub password: String,
    pub path_template: String,
    pub url: String,
}

impl SessionParams {
    /// Extract the known fields from raw session parameters.
    pub fn from_params(params: &Params) -> Self {
        let field = |key: &str| params.get(key).cloned().unwrap_or_default();
        Self {
            username: field("username"),
            password: field("password"),
            path_template: field("path_template"),
            url: field("url"),
        }
    }

    /// Root path for this user: the template with every placeholder replaced.
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(
            self.path_template
                .replace(USERNAME_PLACEHOLDER, &self.username),
        )
    }
}

impl From<&Params> for SessionParams {
    fn from(params: &Params) -> Self {
        Self::from_params(params)
    }
}

impl fmt::Debug for SessionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionParams")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("path_template", &self.path_template)
            .field("url", &self.url)
            .finish()
    }
}
