//! In-memory repository and fixtures shared by unit tests.

use crate::core::models::{Movie, PagingData};
use crate::core::repository::MovieRepository;
use crate::error::{DataError, RemoteError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryCall {
    List(i32),
    Search(i32, String),
    Details(i32),
}

type PageResult = Result<PagingData<Movie>, DataError>;

/// Scripted repository recording every call it receives.
///
/// A gated instance holds each call until a permit is added to the semaphore,
/// which lets tests observe the controller while a fetch is in flight.
#[derive(Default)]
pub struct FakeMovieRepository {
    list_pages: Mutex<HashMap<i32, PageResult>>,
    search_pages: Mutex<HashMap<(i32, String), PageResult>>,
    details: Mutex<HashMap<i32, Result<Movie, DataError>>>,
    calls: Mutex<Vec<RepositoryCall>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn set_list_page(&self, page: i32, result: PageResult) {
        self.list_pages.lock().unwrap().insert(page, result);
    }

    pub fn set_search_page(&self, page: i32, query: &str, result: PageResult) {
        self.search_pages
            .lock()
            .unwrap()
            .insert((page, query.to_string()), result);
    }

    pub fn set_details(&self, id: i32, result: Result<Movie, DataError>) {
        self.details.lock().unwrap().insert(id, result);
    }

    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RepositoryCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
    }
}

#[async_trait]
impl MovieRepository for FakeMovieRepository {
    async fn get_movies(&self, page: i32) -> Result<PagingData<Movie>, DataError> {
        self.record(RepositoryCall::List(page));
        self.pass_gate().await;
        self.list_pages
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .unwrap_or(Err(RemoteError::Unknown.into()))
    }

    async fn search_movies(&self, page: i32, query: &str) -> Result<PagingData<Movie>, DataError> {
        self.record(RepositoryCall::Search(page, query.to_string()));
        self.pass_gate().await;
        self.search_pages
            .lock()
            .unwrap()
            .get(&(page, query.to_string()))
            .cloned()
            .unwrap_or(Err(RemoteError::Unknown.into()))
    }

    async fn get_movie_details(&self, id: i32) -> Result<Movie, DataError> {
        self.record(RepositoryCall::Details(id));
        self.pass_gate().await;
        self.details
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or(Err(RemoteError::Unknown.into()))
    }
}

pub fn movie(id: i32) -> Movie {
    Movie {
        id,
        title: format!("Test Movie {}", id),
        description: format!("Test Description {}", id),
        poster_path: Some(format!("/p{}.jpg", id)),
        vote_average: 7.5,
        vote_count: 100 * id,
    }
}

pub fn movies(ids: &[i32]) -> Vec<Movie> {
    ids.iter().copied().map(movie).collect()
}

pub fn paging(ids: &[i32], total_pages: i32) -> PagingData<Movie> {
    PagingData::new(movies(ids), total_pages)
}
