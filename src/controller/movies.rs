use super::EFFECT_CAPACITY;
use super::intent::{MoviesEffect, MoviesIntent};
use super::state::{MoviesState, PageRequest};
use crate::core::models::{Movie, PagingData};
use crate::core::services::{GetMoviesUseCase, SearchMoviesUseCase};
use crate::error::DataError;
use log::debug;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Paginated, searchable movie list.
///
/// The controller is the only writer of [`MoviesState`]. Page fetches run as
/// tokio tasks; at most one is active at a time, enforced by the `is_loading`
/// guard. Search text changes are debounced, and a newer change aborts the
/// pending restart of the older one.
///
/// Must be created and driven from within a tokio runtime.
pub struct MoviesController {
    shared: Arc<Shared>,
    search_task: Mutex<Option<JoinHandle<()>>>,
}

struct Shared {
    state: watch::Sender<MoviesState>,
    effects: broadcast::Sender<MoviesEffect>,
    get_movies: GetMoviesUseCase,
    search_movies: SearchMoviesUseCase,
    debounce: Duration,
}

impl MoviesController {
    /// Creates the controller and starts loading the first page.
    pub fn new(get_movies: GetMoviesUseCase, search_movies: SearchMoviesUseCase) -> Self {
        Self::with_debounce(get_movies, search_movies, DEFAULT_SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(
        get_movies: GetMoviesUseCase,
        search_movies: SearchMoviesUseCase,
        debounce: Duration,
    ) -> Self {
        let (state, _) = watch::channel(MoviesState::default());
        let (effects, _) = broadcast::channel(EFFECT_CAPACITY);

        let controller = Self {
            shared: Arc::new(Shared {
                state,
                effects,
                get_movies,
                search_movies,
                debounce,
            }),
            search_task: Mutex::new(None),
        };
        controller.shared.load_next_page();
        controller
    }

    /// Receiver of state snapshots, starting from the current one.
    pub fn state(&self) -> watch::Receiver<MoviesState> {
        self.shared.state.subscribe()
    }

    pub fn snapshot(&self) -> MoviesState {
        self.shared.state.borrow().clone()
    }

    /// Subscribes to effects emitted from now on.
    pub fn effects(&self) -> broadcast::Receiver<MoviesEffect> {
        self.shared.effects.subscribe()
    }

    pub fn on_intent(&self, intent: MoviesIntent) {
        debug!("movies intent: {:?}", intent);
        match intent {
            MoviesIntent::LoadNextPage => self.shared.load_next_page(),
            MoviesIntent::SearchQueryChange(query) => self.update_search_query(query),
            MoviesIntent::Retry => self.retry(),
            MoviesIntent::MovieClick(movie_id) => {
                self.shared.emit(MoviesEffect::NavigateToDetails(movie_id))
            }
        }
    }

    /// Waits for a pending search restart and any page load it started, then
    /// returns the settled snapshot.
    ///
    /// Meant for callers that send no further intents while waiting: the pending
    /// search task is taken out of the controller and can no longer be aborted.
    pub async fn wait_until_idle(&self) -> Result<MoviesState, watch::error::RecvError> {
        let pending = self
            .search_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = pending {
            if let Err(error) = task.await {
                debug!("search restart did not complete: {}", error);
            }
        }

        let mut state = self.state();
        let settled = state.wait_for(|s| !s.is_loading).await?;
        Ok(settled.clone())
    }

    fn update_search_query(&self, query: String) {
        let mut search_task = self
            .search_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = search_task.take() {
            previous.abort();
        }

        self.shared
            .state
            .send_modify(|state| state.set_search_query(query));
        self.shared.emit(MoviesEffect::ScrollToTop);

        let shared = Arc::clone(&self.shared);
        *search_task = Some(tokio::spawn(async move {
            tokio::time::sleep(shared.debounce).await;
            // No await point past here: an abort either lands before the reset or not at all.
            shared.state.send_modify(MoviesState::reset_for_search);
            shared.load_next_page();
        }));
    }

    fn retry(&self) {
        self.shared.state.send_modify(MoviesState::reset_for_retry);
        self.shared.load_next_page();
    }
}

impl Drop for MoviesController {
    fn drop(&mut self) {
        let search_task = self
            .search_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = search_task.take() {
            task.abort();
        }
    }
}

impl Shared {
    fn load_next_page(self: &Arc<Self>) {
        let mut request = None;
        self.state.send_if_modified(|state| {
            request = state.begin_page_load();
            request.is_some()
        });

        let Some(request) = request else {
            debug!("page load skipped: already loading or no more pages");
            return;
        };

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let result = shared.fetch(&request).await;
            shared.state.send_modify(|state| match result {
                Ok(page) => state.apply_page(&request, page),
                Err(error) => state.apply_failure(error),
            });
        });
    }

    async fn fetch(&self, request: &PageRequest) -> Result<PagingData<Movie>, DataError> {
        match &request.query {
            None => {
                debug!("loading catalog page {}", request.page);
                self.get_movies.execute(request.page).await
            }
            Some(query) => {
                debug!("loading search page {} for {:?}", request.page, query);
                self.search_movies.execute(request.page, query).await
            }
        }
    }

    fn emit(&self, effect: MoviesEffect) {
        if self.effects.send(effect).is_err() {
            debug!("effect {:?} dropped: no active listener", effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::MovieServices;
    use crate::error::RemoteError;
    use crate::test_support::{FakeMovieRepository, RepositoryCall, movies, paging};
    use tokio::sync::Semaphore;
    use tokio::sync::broadcast::error::TryRecvError;
    use tokio::time::{sleep, timeout};

    fn controller_with(repository: Arc<FakeMovieRepository>) -> MoviesController {
        let services = MovieServices::new(repository, "");
        MoviesController::new(services.get_movies, services.search_movies)
    }

    async fn settle(controller: &MoviesController) -> MoviesState {
        let mut state = controller.state();
        timeout(Duration::from_secs(5), state.wait_for(|s| !s.is_loading))
            .await
            .expect("controller never settled")
            .expect("state channel closed")
            .clone()
    }

    async fn let_tasks_run() {
        sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state_loads_first_page() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1, 2], 3)));

        let controller = controller_with(repository.clone());
        let loading = controller.snapshot();
        assert!(loading.is_loading);
        assert!(loading.movies.is_empty());
        assert!(loading.error.is_none());

        let loaded = settle(&controller).await;
        assert_eq!(loaded.movies, movies(&[1, 2]));
        assert!(loaded.has_more_pages);
        assert_eq!(loaded.current_page, 2);
        assert!(loaded.error.is_none());
        assert_eq!(repository.calls(), vec![RepositoryCall::List(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_next_page_appends_movies() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1, 2], 3)));
        repository.set_list_page(2, Ok(paging(&[3], 3)));

        let controller = controller_with(repository.clone());
        settle(&controller).await;

        controller.on_intent(MoviesIntent::LoadNextPage);
        let loading = controller.snapshot();
        assert!(loading.is_loading);
        assert_eq!(loading.movies, movies(&[1, 2]));

        let loaded = settle(&controller).await;
        assert_eq!(loaded.movies, movies(&[1, 2, 3]));
        assert_eq!(loaded.current_page, 3);
        assert_eq!(
            repository.calls(),
            vec![RepositoryCall::List(1), RepositoryCall::List(2)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_page_stops_pagination() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1, 2], 1)));

        let controller = controller_with(repository.clone());
        let loaded = settle(&controller).await;
        assert_eq!(loaded.movies, movies(&[1, 2]));
        assert_eq!(loaded.current_page, 2);
        assert!(!loaded.has_more_pages);

        controller.on_intent(MoviesIntent::LoadNextPage);
        let_tasks_run().await;
        assert_eq!(controller.snapshot(), loaded);
        assert_eq!(repository.calls(), vec![RepositoryCall::List(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_next_page_while_loading_is_ignored() {
        let gate = Arc::new(Semaphore::new(0));
        let repository = Arc::new(FakeMovieRepository::gated(gate.clone()));
        repository.set_list_page(1, Ok(paging(&[1], 3)));

        let controller = controller_with(repository.clone());
        let_tasks_run().await;
        let in_flight = controller.snapshot();
        assert!(in_flight.is_loading);

        for _ in 0..3 {
            controller.on_intent(MoviesIntent::LoadNextPage);
        }
        let_tasks_run().await;
        assert_eq!(controller.snapshot(), in_flight);
        assert_eq!(repository.calls(), vec![RepositoryCall::List(1)]);

        gate.add_permits(1);
        let loaded = settle(&controller).await;
        assert_eq!(loaded.current_page, 2);
        assert_eq!(repository.calls(), vec![RepositoryCall::List(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_query_replaces_movies() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1, 2], 3)));
        repository.set_search_page(1, "test", Ok(paging(&[4], 2)));

        let controller = controller_with(repository.clone());
        settle(&controller).await;

        controller.on_intent(MoviesIntent::SearchQueryChange("test".to_string()));
        let typed = controller.snapshot();
        assert_eq!(typed.search_query, "test");
        assert_eq!(typed.movies, movies(&[1, 2]));

        sleep(Duration::from_secs(1)).await;
        let loaded = settle(&controller).await;
        assert_eq!(loaded.movies, movies(&[4]));
        assert_eq!(loaded.current_page, 2);
        assert!(loaded.has_more_pages);
        assert_eq!(
            repository.calls(),
            vec![
                RepositoryCall::List(1),
                RepositoryCall::Search(1, "test".to_string())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_waits_for_debounce_interval() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1], 3)));
        repository.set_search_page(1, "x", Ok(paging(&[5], 1)));

        let controller = controller_with(repository.clone());
        settle(&controller).await;

        controller.on_intent(MoviesIntent::SearchQueryChange("x".to_string()));
        sleep(Duration::from_millis(299)).await;
        assert_eq!(repository.calls(), vec![RepositoryCall::List(1)]);
        assert_eq!(controller.snapshot().movies, movies(&[1]));

        sleep(Duration::from_millis(2)).await;
        let_tasks_run().await;
        let loaded = settle(&controller).await;
        assert_eq!(loaded.movies, movies(&[5]));
        assert!(!loaded.has_more_pages);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_query_changes_search_latest_only() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1, 2], 3)));
        repository.set_search_page(1, "ba", Ok(paging(&[6], 1)));

        let controller = controller_with(repository.clone());
        settle(&controller).await;
        let mut effects = controller.effects();

        controller.on_intent(MoviesIntent::SearchQueryChange("b".to_string()));
        assert_eq!(controller.snapshot().search_query, "b");
        controller.on_intent(MoviesIntent::SearchQueryChange("ba".to_string()));
        assert_eq!(controller.snapshot().search_query, "ba");

        sleep(Duration::from_secs(1)).await;
        let loaded = settle(&controller).await;
        assert_eq!(loaded.search_query, "ba");
        assert_eq!(loaded.movies, movies(&[6]));
        assert_eq!(
            repository.calls(),
            vec![
                RepositoryCall::List(1),
                RepositoryCall::Search(1, "ba".to_string())
            ]
        );

        assert_eq!(effects.try_recv().ok(), Some(MoviesEffect::ScrollToTop));
        assert_eq!(effects.try_recv().ok(), Some(MoviesEffect::ScrollToTop));
        assert!(matches!(effects.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_query_never_touches_state() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1, 2], 3)));
        repository.set_search_page(1, "ba", Ok(paging(&[6], 1)));

        let controller = controller_with(repository.clone());
        let settled = settle(&controller).await;

        controller.on_intent(MoviesIntent::SearchQueryChange("b".to_string()));
        sleep(Duration::from_millis(200)).await;
        controller.on_intent(MoviesIntent::SearchQueryChange("ba".to_string()));

        // Past the deadline of "b", before the deadline of "ba".
        sleep(Duration::from_millis(150)).await;
        let pending = controller.snapshot();
        assert_eq!(pending.movies, settled.movies);
        assert_eq!(pending.current_page, settled.current_page);
        assert!(!pending.is_loading);
        assert_eq!(repository.calls(), vec![RepositoryCall::List(1)]);

        sleep(Duration::from_millis(149)).await;
        assert_eq!(repository.calls(), vec![RepositoryCall::List(1)]);

        sleep(Duration::from_millis(2)).await;
        let_tasks_run().await;
        let loaded = settle(&controller).await;
        assert_eq!(loaded.movies, movies(&[6]));
        assert_eq!(
            repository.calls(),
            vec![
                RepositoryCall::List(1),
                RepositoryCall::Search(1, "ba".to_string())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_idle_covers_pending_search() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1], 3)));
        repository.set_search_page(1, "heat", Ok(paging(&[2], 1)));

        let controller = controller_with(repository.clone());
        controller.on_intent(MoviesIntent::SearchQueryChange("heat".to_string()));

        let idle = controller.wait_until_idle().await.expect("state channel closed");
        assert_eq!(idle.search_query, "heat");
        assert_eq!(idle.movies, movies(&[2]));
        assert_eq!(
            repository.calls(),
            vec![
                RepositoryCall::List(1),
                RepositoryCall::Search(1, "heat".to_string())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_subscriber_lags_past_effect_capacity() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1], 3)));

        let controller = controller_with(repository);
        let mut effects = controller.effects();
        for id in 0..=EFFECT_CAPACITY as i32 {
            controller.on_intent(MoviesIntent::MovieClick(id));
        }

        assert!(matches!(
            effects.try_recv(),
            Err(TryRecvError::Lagged(1))
        ));
        assert_eq!(
            effects.try_recv().ok(),
            Some(MoviesEffect::NavigateToDetails(1))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pagination_after_search_uses_query() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1, 2], 3)));
        repository.set_search_page(1, "test", Ok(paging(&[4], 2)));
        repository.set_search_page(2, "test", Ok(paging(&[5], 2)));

        let controller = controller_with(repository.clone());
        settle(&controller).await;

        controller.on_intent(MoviesIntent::SearchQueryChange("test".to_string()));
        sleep(Duration::from_secs(1)).await;
        settle(&controller).await;

        controller.on_intent(MoviesIntent::LoadNextPage);
        let loaded = settle(&controller).await;
        assert_eq!(loaded.movies, movies(&[4, 5]));
        assert!(!loaded.has_more_pages);
        assert_eq!(
            repository.calls()[1..],
            [
                RepositoryCall::Search(1, "test".to_string()),
                RepositoryCall::Search(2, "test".to_string())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_returns_to_catalog() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1], 3)));

        let controller = controller_with(repository.clone());
        settle(&controller).await;

        controller.on_intent(MoviesIntent::SearchQueryChange("   ".to_string()));
        sleep(Duration::from_secs(1)).await;
        let loaded = settle(&controller).await;

        assert_eq!(loaded.movies, movies(&[1]));
        assert_eq!(
            repository.calls(),
            vec![RepositoryCall::List(1), RepositoryCall::List(1)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_state_is_reported() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Err(RemoteError::NoInternet.into()));

        let controller = controller_with(repository.clone());
        let failed = settle(&controller).await;

        assert!(!failed.is_loading);
        assert!(failed.movies.is_empty());
        assert_eq!(failed.error, Some(DataError::Remote(RemoteError::NoInternet)));
        assert_eq!(failed.current_page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_during_search() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1, 2], 3)));
        repository.set_search_page(1, "joker", Err(RemoteError::Unknown.into()));

        let controller = controller_with(repository.clone());
        settle(&controller).await;

        controller.on_intent(MoviesIntent::SearchQueryChange("joker".to_string()));
        sleep(Duration::from_secs(1)).await;
        let failed = settle(&controller).await;

        assert_eq!(failed.error, Some(DataError::Remote(RemoteError::Unknown)));
        assert!(failed.movies.is_empty());
        assert_eq!(failed.search_query, "joker");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_page_keeps_previous_movies() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1, 2], 3)));
        repository.set_list_page(2, Err(RemoteError::Server.into()));

        let controller = controller_with(repository.clone());
        settle(&controller).await;
        controller.on_intent(MoviesIntent::LoadNextPage);
        let failed = settle(&controller).await;

        assert_eq!(failed.movies, movies(&[1, 2]));
        assert_eq!(failed.current_page, 2);
        assert!(failed.has_more_pages);
        assert_eq!(failed.error, Some(DataError::Remote(RemoteError::Server)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_resets_and_loads_again() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Err(RemoteError::NoInternet.into()));

        let controller = controller_with(repository.clone());
        settle(&controller).await;

        repository.set_list_page(1, Ok(paging(&[1, 2], 3)));
        controller.on_intent(MoviesIntent::Retry);

        let loading = controller.snapshot();
        assert!(loading.is_loading);
        assert!(loading.movies.is_empty());
        assert!(loading.error.is_none());

        let loaded = settle(&controller).await;
        assert_eq!(loaded.movies, movies(&[1, 2]));
        assert!(loaded.error.is_none());
        assert_eq!(
            repository.calls(),
            vec![RepositoryCall::List(1), RepositoryCall::List(1)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_discards_loaded_pages_before_fetching() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1, 2], 3)));
        repository.set_list_page(2, Err(RemoteError::RequestTimeout.into()));

        let controller = controller_with(repository.clone());
        settle(&controller).await;
        controller.on_intent(MoviesIntent::LoadNextPage);
        settle(&controller).await;

        controller.on_intent(MoviesIntent::Retry);
        let restarting = controller.snapshot();
        assert!(restarting.movies.is_empty());
        assert_eq!(restarting.current_page, 1);
        assert!(restarting.is_loading);

        let loaded = settle(&controller).await;
        assert_eq!(loaded.movies, movies(&[1, 2]));
        assert_eq!(loaded.current_page, 2);
        assert_eq!(
            repository.calls(),
            vec![
                RepositoryCall::List(1),
                RepositoryCall::List(2),
                RepositoryCall::List(1)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_movie_click_navigates() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1], 3)));

        let controller = controller_with(repository);
        let settled = settle(&controller).await;
        let mut effects = controller.effects();

        controller.on_intent(MoviesIntent::MovieClick(7));
        assert_eq!(
            effects.recv().await.expect("effect expected"),
            MoviesEffect::NavigateToDetails(7)
        );
        assert_eq!(controller.snapshot(), settled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_subscriber_misses_effects() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1], 3)));

        let controller = controller_with(repository);
        controller.on_intent(MoviesIntent::MovieClick(1));

        let mut late = controller.effects();
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_restart_during_page_fetch_is_absorbed_by_guard() {
        let gate = Arc::new(Semaphore::new(0));
        let repository = Arc::new(FakeMovieRepository::gated(gate.clone()));
        repository.set_list_page(1, Ok(paging(&[1, 2], 3)));
        repository.set_search_page(1, "q", Ok(paging(&[9], 1)));

        let controller = controller_with(repository.clone());
        let_tasks_run().await;

        controller.on_intent(MoviesIntent::SearchQueryChange("q".to_string()));
        sleep(Duration::from_millis(500)).await;

        let reset = controller.snapshot();
        assert_eq!(reset.search_query, "q");
        assert!(reset.movies.is_empty());
        assert_eq!(reset.current_page, 1);
        assert!(reset.is_loading);
        assert_eq!(repository.calls(), vec![RepositoryCall::List(1)]);

        gate.add_permits(1);
        let loaded = settle(&controller).await;
        assert_eq!(loaded.movies, movies(&[1, 2]));
        assert_eq!(loaded.current_page, 2);
        assert_eq!(repository.calls(), vec![RepositoryCall::List(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_controller_cancels_pending_search() {
        let repository = Arc::new(FakeMovieRepository::new());
        repository.set_list_page(1, Ok(paging(&[1], 3)));

        let controller = controller_with(repository.clone());
        settle(&controller).await;

        controller.on_intent(MoviesIntent::SearchQueryChange("gone".to_string()));
        drop(controller);
        sleep(Duration::from_secs(1)).await;

        assert_eq!(repository.calls(), vec![RepositoryCall::List(1)]);
    }
}
