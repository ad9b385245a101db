//! Scoped file access for an authenticated user.
//!
//! This module provides:
//! - Lexical path confinement below a per-user root
//! - The session-bound backend that delegates to the host filesystem
//!
//! # Security
//!
//! Requested paths are cleaned under a synthetic `/` before being appended to
//! the user root, so `..` segments cannot climb above it. Symlinks inside the
//! root are followed by the host filesystem like any other path.

pub mod path;
pub mod scoped;

pub use path::{clean, resolve};
pub use scoped::{ScopedFs, DIR_MODE};
