//! Terminal rendering of controller state.

pub mod table;

pub use table::TableDisplay;
