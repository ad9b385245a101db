//! # Storage Backend Interface
//!
//! This crate defines the contract between a file-management service and
//! its pluggable storage backends.
//!
//! ## Overview
//!
//! - **Drivers**: one per backend type, registered by name, able to open a
//!   session from string-keyed parameters
//! - **Backends**: session-bound objects exposing file operations relative to
//!   the session root
//! - **Login Forms**: static descriptors of the fields a user must supply
//! - **Errors**: a single error type shared by every backend
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use backend::{params, Registry};
//!
//! fn open(registry: &Registry) -> backend::Result<()> {
//!     let session = registry.init(&params([
//!         ("type", "accountserver"),
//!         ("username", "alice"),
//!         ("password", "secret"),
//!     ]))?;
//!     for entry in session.ls(&session.home()?)? {
//!         println!("{}", entry.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`interface`]: `Driver` and `Backend` traits
//! - [`registry`]: driver registry keyed by type name
//! - [`form`]: login form descriptors
//! - [`entry`]: directory entry records
//! - [`error`]: error types

pub mod entry;
pub mod error;
pub mod form;
pub mod interface;
pub mod registry;

pub use entry::{FileEntry, FileEntryType};
pub use error::{BackendError, BoxError, Result};
pub use form::{FieldType, Form, FormElement};
pub use interface::{params, Backend, Driver, Params, TYPE_PARAM};
pub use registry::Registry;
