//! The storage backend capability set.
//!
//! A backend type is represented by a [`Driver`], which knows how to open a
//! session from caller-supplied parameters. A successful [`Driver::init`]
//! yields a [`Backend`], a session-bound object whose file operations take
//! paths relative to the session's root.

use std::collections::BTreeMap;
use std::io::Read;

use crate::entry::FileEntry;
use crate::error::Result;
use crate::form::Form;

/// Name of the session parameter that selects the backend type.
pub const TYPE_PARAM: &str = "type";

/// String-keyed session or profile parameters.
pub type Params = BTreeMap<String, String>;

/// Factory for session-bound backends of one type.
pub trait Driver: Send + Sync {
    /// Type name this driver is registered under.
    fn type_name(&self) -> &'static str;

    /// Open a session from the given parameters.
    fn init(&self, params: &Params) -> Result<Box<dyn Backend>>;

    /// Login form describing the parameters a user must supply.
    fn login_form(&self) -> Form;
}

/// File operations of an established session.
///
/// Every path is relative to the session root; implementations are
/// responsible for keeping resolved paths beneath that root.
pub trait Backend: Send + Sync {
    /// Root-relative home path.
    fn home(&self) -> Result<String>;

    /// List a directory.
    fn ls(&self, path: &str) -> Result<Vec<FileEntry>>;

    /// Open a file for reading.
    fn cat(&self, path: &str) -> Result<Box<dyn Read + Send>>;

    /// Create a directory.
    fn mkdir(&self, path: &str) -> Result<()>;

    /// Remove a file or an empty directory.
    fn rm(&self, path: &str) -> Result<()>;

    /// Rename `from` to `to`.
    fn mv(&self, from: &str, to: &str) -> Result<()>;

    /// Replace the contents of a file with everything read from `content`.
    fn save(&self, path: &str, content: &mut dyn Read) -> Result<()>;

    /// Create a file if it does not exist.
    fn touch(&self, path: &str) -> Result<()>;
}

/// Build a [`Params`] map from key/value pairs.
pub fn params<I, K, V>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
