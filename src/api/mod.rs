//! API layer - TMDB HTTP client, wire models and the remote data source.

pub mod call;
pub mod client;
pub mod data_source;
pub mod models;
