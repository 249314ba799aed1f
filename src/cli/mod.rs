//! Command-line front end: argument types, command handlers and the interactive browser.

pub mod browse;
pub mod command_handlers;
pub mod dispatcher;
pub mod main_types;
