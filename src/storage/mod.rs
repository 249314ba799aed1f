//! Persistent settings: the TOML profile file and the access token lookup.
//!
//! The access token is never written to disk; it is read from the environment
//! (or passed on the command line) for every run.

use crate::error::StorageError;

pub mod config;
pub mod credentials;

type Result<T> = std::result::Result<T, StorageError>;
