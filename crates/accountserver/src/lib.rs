//! # Account-Server Storage Backend
//!
//! This crate provides a storage backend that authenticates users against an
//! external account server and confines their file access to a per-user
//! directory.
//!
//! ## Overview
//!
//! Opening a session goes through:
//!
//! - **Parameter Validation**: the caller's parameters must match one of the
//!   administrator-approved connection profiles exactly
//! - **Authentication**: a `checkauth` form POST to the account server, whose
//!   body must be the JSON literal `true` or `false`
//! - **Path Resolution**: the user root is the path template with
//!   `%{username}` replaced by the username
//!
//! The resulting backend maps `ls`, `cat`, `mkdir`, `rm`, `mv`, `save` and
//! `touch` onto the host filesystem below that root.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   backend::Registry                     │
//! ├─────────────────────────────────────────────────────────┤
//! │                  AccountServer driver                   │
//! │                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  │
//! │  │  Validator   │─▶│ AccountClient│─▶│ Path Resolver│  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  │
//! ├─────────────────────────────────────────────────────────┤
//! │                 ScopedFs (per session)                  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use accountserver::Config;
//! use backend::{params, Registry};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default()?;
//!
//!     let mut registry = Registry::new();
//!     accountserver::register(&mut registry, &config)?;
//!
//!     let session = registry.init(&params([
//!         ("type", "accountserver"),
//!         ("username", "alice"),
//!         ("password", "secret"),
//!         ("path_template", "/srv/files/%{username}"),
//!         ("url", "http://accountserver:8000"),
//!     ]))?;
//!     println!("{} entries", session.ls("/")?.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading, defaults and connection profiles
//! - [`validator`]: Session parameter validation
//! - [`auth`]: Account-server client and typed session parameters
//! - [`files`]: Path confinement and scoped file operations
//! - [`driver`]: The registered backend driver

pub mod auth;
pub mod config;
pub mod driver;
pub mod files;
pub mod validator;

/// Type name this backend is registered under.
pub const TYPE_NAME: &str = "accountserver";

// Re-export commonly used types
pub use auth::{AccountClient, SessionParams, USERNAME_PLACEHOLDER};
pub use config::{Config, ConfigError, ConnectionProfile, EnvOverride};
pub use driver::{login_form, AccountServer};
pub use files::ScopedFs;
pub use validator::check_params;

/// Register the `accountserver` driver built from `config`.
pub fn register(registry: &mut backend::Registry, config: &Config) -> backend::Result<()> {
    registry.register(Box::new(AccountServer::new(config)?));
    Ok(())
}
