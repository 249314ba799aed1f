use super::complete_poster_path;
use crate::core::models::Movie;
use crate::core::repository::MovieRepository;
use crate::error::DataError;
use std::sync::Arc;

#[derive(Clone)]
pub struct GetMovieDetailsUseCase {
    repository: Arc<dyn MovieRepository>,
    image_base_url: String,
}

impl GetMovieDetailsUseCase {
    pub fn new(repository: Arc<dyn MovieRepository>, image_base_url: &str) -> Self {
        Self {
            repository,
            image_base_url: image_base_url.to_string(),
        }
    }

    pub async fn execute(&self, movie_id: i32) -> Result<Movie, DataError> {
        self.repository
            .get_movie_details(movie_id)
            .await
            .map(|movie| complete_poster_path(movie, &self.image_base_url))
    }
}
