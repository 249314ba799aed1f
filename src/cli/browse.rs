//! Interactive browsing over stdin.
//!
//! The list screen is re-rendered on every state snapshot. Opening a movie goes
//! through `MovieClick`, whose `NavigateToDetails` effect switches to the detail
//! screen; `b` there emits `NavigateBack` and returns to the list.

use crate::controller::{
    MovieDetailsController, MovieDetailsEffect, MovieDetailsIntent, MoviesController,
    MoviesEffect, MoviesIntent, MoviesState,
};
use crate::core::services::MovieServices;
use crate::display::TableDisplay;
use crate::error::{AppError, CliError};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use log::debug;
use std::io::stdout;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::broadcast::error::RecvError;

const LIST_HELP: &str =
    "Commands: n = next page, /text = search (/ alone clears), r = retry, o <id> = open, q = quit";
const DETAILS_HELP: &str = "Commands: r = retry, b = back, q = quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Intent(MoviesIntent),
    Help,
    Quit,
    Unknown(String),
}

/// Parses one line typed on the list screen.
pub fn parse_list_command(line: &str) -> BrowseCommand {
    let line = line.trim();

    if let Some(query) = line.strip_prefix('/') {
        return BrowseCommand::Intent(MoviesIntent::SearchQueryChange(query.trim().to_string()));
    }

    match line {
        "n" | "next" => BrowseCommand::Intent(MoviesIntent::LoadNextPage),
        "r" | "retry" => BrowseCommand::Intent(MoviesIntent::Retry),
        "q" | "quit" => BrowseCommand::Quit,
        "h" | "?" | "help" => BrowseCommand::Help,
        _ => match line.strip_prefix("o ").map(str::trim).map(str::parse::<i32>) {
            Some(Ok(id)) if id > 0 => BrowseCommand::Intent(MoviesIntent::MovieClick(id)),
            _ => BrowseCommand::Unknown(line.to_string()),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsCommand {
    Intent(MovieDetailsIntent),
    Quit,
    Unknown,
}

pub fn parse_details_command(line: &str) -> DetailsCommand {
    match line.trim() {
        "r" | "retry" => DetailsCommand::Intent(MovieDetailsIntent::OnRetry),
        "b" | "back" => DetailsCommand::Intent(MovieDetailsIntent::OnBackClick),
        "q" | "quit" => DetailsCommand::Quit,
        _ => DetailsCommand::Unknown,
    }
}

enum DetailsExit {
    Back,
    Quit,
}

pub struct BrowseSession {
    services: MovieServices,
    debounce: Duration,
    display: TableDisplay,
}

impl BrowseSession {
    pub fn new(services: MovieServices, debounce: Duration, display: TableDisplay) -> Self {
        Self {
            services,
            debounce,
            display,
        }
    }

    /// Runs until `q` or end of input.
    pub async fn run(&self) -> Result<(), AppError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        self.run_with(&mut lines).await?;
        Ok(())
    }

    /// Drives a session from `lines` and returns the list state it ended on.
    ///
    /// At end of input, pending work (a debounced search and the page load it
    /// starts) finishes and is rendered before returning, so piped input shows
    /// its results. `q` returns right away.
    pub async fn run_with<R>(&self, lines: &mut Lines<R>) -> Result<MoviesState, AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        let controller = MoviesController::with_debounce(
            self.services.get_movies.clone(),
            self.services.search_movies.clone(),
            self.debounce,
        );
        let mut state = controller.state();
        let mut effects = controller.effects();
        println!("{}", LIST_HELP);

        loop {
            // Effects caused by earlier lines are handled before later input.
            tokio::select! {
                biased;
                changed = state.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = state.borrow_and_update().clone();
                    println!("{}", self.display.render_movies_screen(&snapshot));
                }
                effect = effects.recv() => match effect {
                    Ok(MoviesEffect::ScrollToTop) => clear_screen()?,
                    Ok(MoviesEffect::NavigateToDetails(movie_id)) => {
                        match self.show_details(lines, movie_id).await? {
                            DetailsExit::Back => {
                                let snapshot = state.borrow_and_update().clone();
                                println!("{}", LIST_HELP);
                                println!("{}", self.display.render_movies_screen(&snapshot));
                            }
                            DetailsExit::Quit => break,
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => debug!("skipped {} effect(s)", skipped),
                    Err(RecvError::Closed) => break,
                },
                line = lines.next_line() => {
                    let Some(line) = line.map_err(CliError::from)? else {
                        let settled = controller
                            .wait_until_idle()
                            .await
                            .map_err(|_| CliError::ControllerClosed)?;
                        println!("{}", self.display.render_movies_screen(&settled));
                        return Ok(settled);
                    };
                    match parse_list_command(&line) {
                        BrowseCommand::Intent(intent) => controller.on_intent(intent),
                        BrowseCommand::Help => println!("{}", LIST_HELP),
                        BrowseCommand::Quit => break,
                        BrowseCommand::Unknown(text) if text.is_empty() => {}
                        BrowseCommand::Unknown(text) => {
                            println!("Unknown command '{}'. {}", text, LIST_HELP)
                        }
                    }
                }
            }
        }

        Ok(controller.snapshot())
    }

    async fn show_details<R>(
        &self,
        lines: &mut Lines<R>,
        movie_id: i32,
    ) -> Result<DetailsExit, AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        let controller =
            MovieDetailsController::new(self.services.get_movie_details.clone(), movie_id);
        let mut state = controller.state();
        let mut effects = controller.effects();
        println!("{}", DETAILS_HELP);

        loop {
            tokio::select! {
                biased;
                changed = state.changed() => {
                    if changed.is_err() {
                        return Ok(DetailsExit::Back);
                    }
                    let snapshot = state.borrow_and_update().clone();
                    println!("{}", self.display.render_details_screen(&snapshot));
                }
                effect = effects.recv() => match effect {
                    Ok(MovieDetailsEffect::NavigateBack) | Err(RecvError::Closed) => {
                        return Ok(DetailsExit::Back);
                    }
                    Err(RecvError::Lagged(skipped)) => debug!("skipped {} effect(s)", skipped),
                },
                line = lines.next_line() => {
                    let Some(line) = line.map_err(CliError::from)? else {
                        return Ok(DetailsExit::Quit);
                    };
                    match parse_details_command(&line) {
                        DetailsCommand::Intent(intent) => controller.on_intent(intent),
                        DetailsCommand::Quit => return Ok(DetailsExit::Quit),
                        DetailsCommand::Unknown => println!("{}", DETAILS_HELP),
                    }
                }
            }
        }
    }
}

fn clear_screen() -> Result<(), AppError> {
    execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0)).map_err(CliError::from)?;
    Ok(())
}
