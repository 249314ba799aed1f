//! Core layer - domain models, repository and use cases.

pub mod models;
pub mod repository;
pub mod services;
