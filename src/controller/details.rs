use super::EFFECT_CAPACITY;
use super::intent::{MovieDetailsEffect, MovieDetailsIntent};
use super::state::MovieDetailsState;
use crate::core::services::GetMovieDetailsUseCase;
use log::debug;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

/// Detail view of a single movie.
///
/// Loads the movie once on creation; `OnRetry` issues the load again.
/// Must be created within a tokio runtime.
pub struct MovieDetailsController {
    shared: Arc<Shared>,
}

struct Shared {
    movie_id: i32,
    state: watch::Sender<MovieDetailsState>,
    effects: broadcast::Sender<MovieDetailsEffect>,
    get_movie_details: GetMovieDetailsUseCase,
}

impl MovieDetailsController {
    pub fn new(get_movie_details: GetMovieDetailsUseCase, movie_id: i32) -> Self {
        let (state, _) = watch::channel(MovieDetailsState::default());
        let (effects, _) = broadcast::channel(EFFECT_CAPACITY);

        let controller = Self {
            shared: Arc::new(Shared {
                movie_id,
                state,
                effects,
                get_movie_details,
            }),
        };
        controller.shared.load();
        controller
    }

    pub fn movie_id(&self) -> i32 {
        self.shared.movie_id
    }

    pub fn state(&self) -> watch::Receiver<MovieDetailsState> {
        self.shared.state.subscribe()
    }

    pub fn snapshot(&self) -> MovieDetailsState {
        self.shared.state.borrow().clone()
    }

    pub fn effects(&self) -> broadcast::Receiver<MovieDetailsEffect> {
        self.shared.effects.subscribe()
    }

    pub fn on_intent(&self, intent: MovieDetailsIntent) {
        debug!("details intent for movie {}: {:?}", self.shared.movie_id, intent);
        match intent {
            MovieDetailsIntent::OnRetry => self.shared.load(),
            MovieDetailsIntent::OnBackClick => {
                if self.shared.effects.send(MovieDetailsEffect::NavigateBack).is_err() {
                    debug!("NavigateBack dropped: no active listener");
                }
            }
        }
    }
}

impl Shared {
    fn load(self: &Arc<Self>) {
        self.state.send_modify(MovieDetailsState::begin_load);

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            debug!("loading details for movie {}", shared.movie_id);
            let result = shared.get_movie_details.execute(shared.movie_id).await;
            shared.state.send_modify(|state| match result {
                Ok(movie) => state.apply_movie(movie),
                Err(error) => state.apply_failure(error),
            });
        });
    }
}
