use crate::controller::{
    MovieDetailsController, MovieDetailsState, MoviesController, MoviesIntent, MoviesState,
};
use crate::core::services::MovieServices;
use crate::error::{AppError, CliError};
use crate::storage::config::{CONFIG_KEYS, Config};
use crate::utils::validation::{validate_movie_id, validate_page_count};
use log::{debug, info};
use std::path::Path;
use std::time::Duration;
use tokio::sync::watch;

/// Waits until no load is in flight and returns that snapshot.
pub async fn wait_until_settled<T, F>(
    receiver: &mut watch::Receiver<T>,
    is_loading: F,
) -> Result<T, AppError>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let settled = receiver
        .wait_for(|state| !is_loading(state))
        .await
        .map_err(|_| CliError::ControllerClosed)?;
    Ok(settled.clone())
}

/// Drives the list and detail controllers for the non-interactive commands.
pub struct MovieHandler {
    services: MovieServices,
    debounce: Duration,
}

impl MovieHandler {
    pub fn new(services: MovieServices, debounce: Duration) -> Self {
        Self { services, debounce }
    }

    fn controller(&self) -> MoviesController {
        MoviesController::with_debounce(
            self.services.get_movies.clone(),
            self.services.search_movies.clone(),
            self.debounce,
        )
    }

    /// Loads up to `pages` catalog pages and returns the final state.
    pub async fn list(&self, pages: u32) -> Result<MoviesState, AppError> {
        let pages = validate_page_count(pages)?;
        let controller = self.controller();
        let mut state = controller.state();

        wait_until_settled(&mut state, |s: &MoviesState| s.is_loading).await?;
        self.load_more(&controller, &mut state, pages).await
    }

    /// Searches for `query` and loads up to `pages` result pages.
    pub async fn search(&self, query: &str, pages: u32) -> Result<MoviesState, AppError> {
        let pages = validate_page_count(pages)?;
        if query.trim().is_empty() {
            return Err(CliError::InvalidArguments("Search text cannot be empty".to_string()).into());
        }

        let controller = self.controller();
        let mut state = controller.state();
        // The initial catalog load must finish first or the guard would swallow the search.
        wait_until_settled(&mut state, |s: &MoviesState| s.is_loading).await?;

        controller.on_intent(MoviesIntent::SearchQueryChange(query.to_string()));
        controller
            .wait_until_idle()
            .await
            .map_err(|_| CliError::ControllerClosed)?;

        self.load_more(&controller, &mut state, pages).await
    }

    async fn load_more(
        &self,
        controller: &MoviesController,
        state: &mut watch::Receiver<MoviesState>,
        pages: u32,
    ) -> Result<MoviesState, AppError> {
        let mut current = controller.snapshot();
        let mut loaded = 1;

        while loaded < pages && current.error.is_none() && current.has_more_pages {
            controller.on_intent(MoviesIntent::LoadNextPage);
            current = wait_until_settled(state, |s: &MoviesState| s.is_loading).await?;
            loaded += 1;
        }

        debug!(
            "stopped after {} page(s): {} movie(s), more={}",
            loaded,
            current.movies.len(),
            current.has_more_pages
        );

        match current.error {
            Some(error) if current.movies.is_empty() => Err(AppError::Data(error)),
            _ => Ok(current),
        }
    }

    pub async fn details(&self, movie_id: i32) -> Result<MovieDetailsState, AppError> {
        let movie_id = validate_movie_id(movie_id)?;
        let controller = MovieDetailsController::new(self.services.get_movie_details.clone(), movie_id);
        let mut state = controller.state();

        let settled =
            wait_until_settled(&mut state, |s: &MovieDetailsState| s.is_loading).await?;
        match settled.error {
            Some(error) => Err(AppError::Data(error)),
            None => Ok(settled),
        }
    }
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&self, config: &Config, active_profile: &str) -> String {
        let mut lines = vec![
            "Current Configuration:".to_string(),
            "=====================".to_string(),
            format!(
                "Default Profile: {}",
                config.default_profile.as_deref().unwrap_or("(not set)")
            ),
            format!("Active Profile: {}", active_profile),
            String::new(),
            "Profiles:".to_string(),
        ];

        if config.profiles.is_empty() {
            lines.push("  No profiles configured".to_string());
        }
        for (name, profile) in &config.profiles {
            lines.push(format!("  [{}]", name));
            lines.push(format!("    API URL: {}", profile.api_url));
            lines.push(format!("    Image base URL: {}", profile.image_base_url));
            lines.push(format!("    Timeout: {} seconds", profile.timeout_seconds()));
            lines.push(format!(
                "    Search debounce: {} ms",
                profile.debounce().as_millis()
            ));
        }

        lines.join("\n")
    }

    /// Updates `key` on the profile, then writes the config to `path`.
    pub fn set(
        &self,
        config: &mut Config,
        profile_name: &str,
        key: &str,
        value: &str,
        path: &Path,
    ) -> Result<String, AppError> {
        config.set_value(profile_name, key, value)?;
        config.save(Some(path.to_path_buf()))?;
        info!("set {} on profile {}", key, profile_name);

        Ok(format!(
            "✅ {} updated on profile '{}' (valid keys: {})",
            key,
            profile_name,
            CONFIG_KEYS.join(", ")
        ))
    }
}
