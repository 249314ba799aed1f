//! Intents accepted by the controllers and one-shot effects they emit.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoviesIntent {
    LoadNextPage,
    SearchQueryChange(String),
    MovieClick(i32),
    Retry,
}

/// Delivered once to each subscriber listening at the time of emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoviesEffect {
    NavigateToDetails(i32),
    ScrollToTop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieDetailsIntent {
    OnRetry,
    OnBackClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieDetailsEffect {
    NavigateBack,
}
