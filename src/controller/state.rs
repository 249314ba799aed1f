//! Session state and the transitions applied to it.
//!
//! Every method here is a pure reducer. The controllers run them inside
//! `watch::Sender::send_modify`, so each transition is applied whole and
//! observers never see half of one.

use crate::core::models::{Movie, PagingData};
use crate::error::DataError;

#[derive(Debug, Clone, PartialEq)]
pub struct MoviesState {
    pub movies: Vec<Movie>,
    pub is_loading: bool,
    pub error: Option<DataError>,
    pub has_more_pages: bool,
    pub search_query: String,
    /// Next page to fetch, 1-based.
    pub current_page: i32,
}

impl Default for MoviesState {
    fn default() -> Self {
        Self {
            movies: Vec::new(),
            is_loading: false,
            error: None,
            has_more_pages: true,
            search_query: String::new(),
            current_page: 1,
        }
    }
}

/// What a started page load fetches. Captured when the load begins so that the
/// merge uses the page that was actually requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i32,
    /// `None` loads the discover list, `Some` a search page.
    pub query: Option<String>,
}

impl MoviesState {
    /// Starts a page load unless one is running or the last page was reached.
    pub fn begin_page_load(&mut self) -> Option<PageRequest> {
        if self.is_loading || !self.has_more_pages {
            return None;
        }

        self.is_loading = true;
        self.error = None;

        let query = if self.search_query.trim().is_empty() {
            None
        } else {
            Some(self.search_query.clone())
        };

        Some(PageRequest {
            page: self.current_page,
            query,
        })
    }

    pub fn apply_page(&mut self, request: &PageRequest, page: PagingData<Movie>) {
        if request.page == 1 {
            self.movies = page.data;
        } else {
            self.movies.extend(page.data);
        }
        self.is_loading = false;
        self.has_more_pages = page.total_pages != request.page;
        self.current_page = request.page + 1;
    }

    /// Records a failed load. Movies fetched so far and the page cursor are kept.
    pub fn apply_failure(&mut self, error: DataError) {
        self.is_loading = false;
        self.error = Some(error);
    }

    pub fn set_search_query(&mut self, query: String) {
        self.search_query = query;
    }

    pub fn reset_for_search(&mut self) {
        self.current_page = 1;
        self.movies.clear();
        self.has_more_pages = true;
    }

    pub fn reset_for_retry(&mut self) {
        self.current_page = 1;
        self.movies.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieDetailsState {
    pub movie: Option<Movie>,
    pub is_loading: bool,
    pub error: Option<DataError>,
}

impl MovieDetailsState {
    pub fn begin_load(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn apply_movie(&mut self, movie: Movie) {
        self.movie = Some(movie);
        self.is_loading = false;
    }

    pub fn apply_failure(&mut self, error: DataError) {
        self.is_loading = false;
        self.error = Some(error);
    }
}
