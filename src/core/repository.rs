use crate::api::data_source::RemoteMovieDataSource;
use crate::api::models::{MovieDto, MovieListDto};
use crate::core::models::{Movie, PagingData};
use crate::error::DataError;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn get_movies(&self, page: i32) -> Result<PagingData<Movie>, DataError>;
    async fn search_movies(&self, page: i32, query: &str) -> Result<PagingData<Movie>, DataError>;
    async fn get_movie_details(&self, id: i32) -> Result<Movie, DataError>;
}

/// Repository that reshapes data source payloads into domain values.
#[derive(Clone)]
pub struct DefaultMovieRepository {
    data_source: Arc<dyn RemoteMovieDataSource>,
}

impl DefaultMovieRepository {
    pub fn new(data_source: Arc<dyn RemoteMovieDataSource>) -> Self {
        Self { data_source }
    }
}

#[async_trait]
impl MovieRepository for DefaultMovieRepository {
    async fn get_movies(&self, page: i32) -> Result<PagingData<Movie>, DataError> {
        self.data_source.get_movies(page).await.map(PagingData::from)
    }

    async fn search_movies(
        &self,
        page: i32,
        query: &str,
    ) -> Result<PagingData<Movie>, DataError> {
        self.data_source
            .search_movies(page, query)
            .await
            .map(PagingData::from)
    }

    async fn get_movie_details(&self, id: i32) -> Result<Movie, DataError> {
        self.data_source.get_movie_details(id).await.map(Movie::from)
    }
}

impl From<MovieDto> for Movie {
    fn from(dto: MovieDto) -> Self {
        Movie {
            id: dto.id,
            title: dto.title,
            description: dto.description,
            poster_path: dto.poster_path,
            vote_average: dto.vote_average,
            vote_count: dto.vote_count,
        }
    }
}

impl From<MovieListDto> for PagingData<Movie> {
    fn from(dto: MovieListDto) -> Self {
        PagingData {
            data: dto.results.into_iter().map(Movie::from).collect(),
            total_pages: dto.total_pages,
        }
    }
}
