use crate::cli::browse::BrowseSession;
use crate::cli::command_handlers::{ConfigHandler, MovieHandler};
use crate::cli::main_types::{Commands, ConfigCommands};
use crate::core::services::MovieServices;
use crate::display::TableDisplay;
use crate::error::AppError;
use crate::storage::config::Config;
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

pub struct Dispatcher {
    config: Config,
    config_path: PathBuf,
    profile_name: String,
    access_token: Option<String>,
}

impl Dispatcher {
    pub fn new(
        config: Config,
        config_path: PathBuf,
        profile_name: String,
        access_token: Option<String>,
    ) -> Self {
        debug!(
            "dispatcher for profile '{}' (config {})",
            profile_name,
            config_path.display()
        );
        Self {
            config,
            config_path,
            profile_name,
            access_token,
        }
    }

    pub async fn dispatch(&mut self, command: Commands) -> Result<(), AppError> {
        let display = TableDisplay::new();
        match command {
            Commands::Config { command } => self.handle_config_command(command),
            Commands::List { pages } => {
                let state = self.movie_handler()?.list(pages).await?;
                println!("{}", display.render_movies_screen(&state));
                Ok(())
            }
            Commands::Search { query, pages } => {
                let state = self.movie_handler()?.search(&query, pages).await?;
                println!("{}", display.render_movies_screen(&state));
                Ok(())
            }
            Commands::Details { id } => {
                let state = self.movie_handler()?.details(id).await?;
                println!("{}", display.render_details_screen(&state));
                Ok(())
            }
            Commands::Browse => {
                let (services, debounce) = self.movie_services()?;
                BrowseSession::new(services, debounce, display).run().await
            }
        }
    }

    fn movie_services(&self) -> Result<(MovieServices, Duration), AppError> {
        let profile = self.config.active_profile(Some(self.profile_name.as_str()))?;
        let services = MovieServices::from_profile(&profile, self.access_token.clone())?;
        Ok((services, profile.debounce()))
    }

    fn movie_handler(&self) -> Result<MovieHandler, AppError> {
        let (services, debounce) = self.movie_services()?;
        Ok(MovieHandler::new(services, debounce))
    }

    fn handle_config_command(&mut self, command: ConfigCommands) -> Result<(), AppError> {
        let handler = ConfigHandler::new();
        match command {
            ConfigCommands::Show => {
                println!("{}", handler.show(&self.config, &self.profile_name));
                println!("\nConfig file: {}", self.config_path.display());
            }
            ConfigCommands::Set { key, value } => {
                let message = handler.set(
                    &mut self.config,
                    &self.profile_name,
                    &key,
                    &value,
                    &self.config_path,
                )?;
                println!("{}", message);
            }
        }
        Ok(())
    }
}
