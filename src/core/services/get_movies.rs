use super::complete_poster_path;
use crate::core::models::{Movie, PagingData};
use crate::core::repository::MovieRepository;
use crate::error::DataError;
use std::sync::Arc;

/// Loads one page of the discover catalog.
#[derive(Clone)]
pub struct GetMoviesUseCase {
    repository: Arc<dyn MovieRepository>,
    image_base_url: String,
}

impl GetMoviesUseCase {
    pub fn new(repository: Arc<dyn MovieRepository>, image_base_url: &str) -> Self {
        Self {
            repository,
            image_base_url: image_base_url.to_string(),
        }
    }

    pub async fn execute(&self, page: i32) -> Result<PagingData<Movie>, DataError> {
        self.repository
            .get_movies(page)
            .await
            .map(|paging| paging.map(|movie| complete_poster_path(movie, &self.image_base_url)))
    }
}
