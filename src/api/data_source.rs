use crate::api::call::api_call;
use crate::api::client::TmdbClient;
use crate::api::models::{MovieDto, MovieListDto};
use crate::error::DataError;
use async_trait::async_trait;
use log::debug;
use reqwest::Method;

/// Remote source of raw movie payloads.
///
/// Implementations classify every failure before returning it; retries are not
/// attempted here.
#[async_trait]
pub trait RemoteMovieDataSource: Send + Sync {
    async fn get_movies(&self, page: i32) -> Result<MovieListDto, DataError>;
    async fn search_movies(&self, page: i32, query: &str) -> Result<MovieListDto, DataError>;
    async fn get_movie_details(&self, id: i32) -> Result<MovieDto, DataError>;
}

/// [`RemoteMovieDataSource`] backed by the TMDB v3 HTTP API.
#[derive(Debug, Clone)]
pub struct TmdbDataSource {
    client: TmdbClient,
}

impl TmdbDataSource {
    pub fn new(client: TmdbClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteMovieDataSource for TmdbDataSource {
    async fn get_movies(&self, page: i32) -> Result<MovieListDto, DataError> {
        let endpoint = "/discover/movie";
        debug!("GET {} page={}", endpoint, page);

        let request = self
            .client
            .build_request(Method::GET, endpoint)
            .query(&[("page", page)]);

        Ok(api_call(endpoint, request.send()).await?)
    }

    async fn search_movies(&self, page: i32, query: &str) -> Result<MovieListDto, DataError> {
        let endpoint = "/search/movie";
        debug!("GET {} page={} query={:?}", endpoint, page, query);

        let page = page.to_string();
        let request = self
            .client
            .build_request(Method::GET, endpoint)
            .query(&[("page", page.as_str()), ("query", query)]);

        Ok(api_call(endpoint, request.send()).await?)
    }

    async fn get_movie_details(&self, id: i32) -> Result<MovieDto, DataError> {
        let endpoint = format!("/movie/{}", id);
        debug!("GET {}", endpoint);

        let request = self.client.build_request(Method::GET, &endpoint);

        Ok(api_call(&endpoint, request.send()).await?)
    }
}
