//! Controllers turning user intents into state transitions and effects.
//!
//! State is published through a `tokio::sync::watch` channel (latest snapshot
//! for any number of observers) and effects through a `broadcast` channel
//! (delivered only to subscribers that are listening when they are emitted).

pub mod details;
pub mod intent;
pub mod movies;
pub mod state;

pub use details::MovieDetailsController;
pub use intent::{MovieDetailsEffect, MovieDetailsIntent, MoviesEffect, MoviesIntent};
pub use movies::MoviesController;
pub use state::{MovieDetailsState, MoviesState};

/// Effects a subscriber may fall behind by. Past this, its next `recv` reports
/// `Lagged` and the oldest effects are gone for that subscriber. Every intent
/// emits at most one effect, so this only bites a listener that stops draining.
const EFFECT_CAPACITY: usize = 16;
