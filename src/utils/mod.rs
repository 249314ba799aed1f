//! Helpers shared by the storage, display and CLI layers.

/// `env_logger` setup for the binary
pub mod logging;

/// Width-aware text helpers for table cells
pub mod text;

/// Checks on user input and configuration values
pub mod validation;
