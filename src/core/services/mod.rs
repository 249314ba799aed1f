//! Use cases over the movie repository.
//!
//! Each use case wraps one repository call and completes poster paths with the
//! configured image base URL. Errors pass through untouched.

pub mod get_movie_details;
pub mod get_movies;
pub mod search_movies;

pub use get_movie_details::GetMovieDetailsUseCase;
pub use get_movies::GetMoviesUseCase;
pub use search_movies::SearchMoviesUseCase;

use crate::api::client::TmdbClient;
use crate::api::data_source::TmdbDataSource;
use crate::core::models::Movie;
use crate::core::repository::{DefaultMovieRepository, MovieRepository};
use crate::error::AppError;
use crate::storage::config::Profile;
use log::warn;
use std::sync::Arc;
use std::time::Duration;

/// Prefixes a present poster path with `image_base_url`.
///
/// Plain concatenation: `"https://img/"` + `"/p.jpg"` gives `"https://img//p.jpg"`.
pub fn complete_poster_path(movie: Movie, image_base_url: &str) -> Movie {
    Movie {
        poster_path: movie
            .poster_path
            .map(|path| format!("{}{}", image_base_url, path)),
        ..movie
    }
}

/// The three use cases wired against one repository.
#[derive(Clone)]
pub struct MovieServices {
    pub get_movies: GetMoviesUseCase,
    pub search_movies: SearchMoviesUseCase,
    pub get_movie_details: GetMovieDetailsUseCase,
}

impl MovieServices {
    pub fn new(repository: Arc<dyn MovieRepository>, image_base_url: &str) -> Self {
        Self {
            get_movies: GetMoviesUseCase::new(Arc::clone(&repository), image_base_url),
            search_movies: SearchMoviesUseCase::new(Arc::clone(&repository), image_base_url),
            get_movie_details: GetMovieDetailsUseCase::new(repository, image_base_url),
        }
    }

    /// Builds the HTTP stack for a profile: client, data source, repository.
    pub fn from_profile(profile: &Profile, access_token: Option<String>) -> Result<Self, AppError> {
        let timeout = Duration::from_secs(profile.timeout_seconds());
        let mut client = TmdbClient::with_timeout(profile.api_url.clone(), timeout)?;
        if let Some(token) = access_token {
            client = client.with_access_token(token);
        }
        if !client.is_authenticated() {
            warn!("no access token set; TMDB will reject most requests");
        }

        let data_source = Arc::new(TmdbDataSource::new(client));
        let repository = Arc::new(DefaultMovieRepository::new(data_source));
        Ok(Self::new(repository, &profile.image_base_url))
    }
}
