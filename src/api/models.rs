use serde::{Deserialize, Serialize};

/// A movie as returned by the TMDB API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: i32,
    pub title: String,
    #[serde(rename = "overview")]
    pub description: String,
    pub poster_path: Option<String>,
    pub vote_average: f32,
    pub vote_count: i32,
}

/// One page of `discover/movie` or `search/movie` results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieListDto {
    pub results: Vec<MovieDto>,
    pub page: i32,
    pub total_pages: i32,
}
