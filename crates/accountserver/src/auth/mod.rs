//! Account-server authentication.
//!
//! This module provides the typed view of validated session parameters and
//! the HTTP client that asks the account server whether a username and
//! password pair is valid.

pub mod client;
pub mod session;

pub use client::{parse_auth_response, AccountClient};
pub use session::{SessionParams, USERNAME_PLACEHOLDER};
