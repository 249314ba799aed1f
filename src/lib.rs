//! # movie-catalog
//!
//! Paginated, searchable movie catalog backed by a TMDB-style HTTP API.
//!
//! A [`controller::MoviesController`] owns the list session: it loads pages on
//! demand, restarts from page 1 when the search text changes (after a debounce),
//! and reports every failure as a classified [`error::DataError`] so that a
//! front end can show a hint and offer a retry.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use movie_catalog::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> movie_catalog::Result<()> {
//!     let config = Config::load(None)?;
//!     let profile = config.active_profile(None)?;
//!     let services = MovieServices::from_profile(&profile, get_access_token())?;
//!
//!     let controller = MoviesController::new(services.get_movies, services.search_movies);
//!     let mut state = controller.state();
//!     let loaded = state.wait_for(|s| !s.is_loading).await.map(|s| s.clone());
//!     println!("{:?}", loaded.map(|s| s.movies.len()));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │         Controller Layer            │  State machine, intents, effects
//! ├─────────────────────────────────────┤
//! │           Core Layer                │  Domain models, repository, use cases
//! ├─────────────────────────────────────┤
//! │           API Layer                 │  HTTP client, wire models, classification
//! ├─────────────────────────────────────┤
//! │      Storage / Utils Layers         │  Profiles, access token, validation
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`]: TMDB client, payload models and the remote data source
//! - [`core`]: `Movie`, `PagingData`, the repository and the three use cases
//! - [`controller`]: list and detail controllers publishing state over `watch`
//! - [`storage`]: TOML profiles and the access token lookup
//! - [`display`]: table rendering for the terminal
//! - [`cli`]: the `movie-catalog` command line
//! - [`error`]: error taxonomy with troubleshooting hints

pub use error::AppError;

/// Commonly used types in one import.
pub mod prelude {
    pub use crate::Result;
    pub use crate::error::{AppError, DataError, LocalError, RemoteError};

    pub use crate::core::models::{Movie, PagingData};
    pub use crate::core::services::MovieServices;

    pub use crate::controller::{
        MovieDetailsController, MovieDetailsEffect, MovieDetailsIntent, MovieDetailsState,
        MoviesController, MoviesEffect, MoviesIntent, MoviesState,
    };

    pub use crate::storage::config::{Config, Profile};
    pub use crate::storage::credentials::get_access_token;
}

pub mod cli;
pub mod controller;
pub mod core;
pub mod storage;

pub mod api;
pub mod display;
pub mod error;
pub mod utils;

#[cfg(test)]
mod test_support;

pub type Result<T> = std::result::Result<T, AppError>;
