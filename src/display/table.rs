use crate::controller::{MovieDetailsState, MoviesState};
use crate::core::models::Movie;
use crate::error::{AppError, DataError};
use crate::utils::text::{format_rating, single_line, truncate_text_unicode};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use crossterm::terminal;

/// Renders movies, detail views and errors as text for the terminal.
pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: true,
        }
    }

    /// Terminal width clamped to 40..=200, or 80 when it cannot be read.
    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _rows)) => Some((cols as usize).clamp(40, 200)),
            Err(_) => Some(80),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn header_cell(&self, label: &str) -> Cell {
        if self.use_colors {
            Cell::new(label)
                .add_attribute(Attribute::Bold)
                .fg(Color::Cyan)
        } else {
            Cell::new(label)
        }
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        self.configure_table_width(&mut table);
        table
    }

    /// Renders the movie list with one row per movie, in list order.
    pub fn render_movie_list(&self, movies: &[Movie]) -> String {
        if movies.is_empty() {
            return "No movies found.".to_string();
        }

        let mut table = self.new_table();
        table.set_header(vec![
            self.header_cell("#"),
            self.header_cell("ID"),
            self.header_cell("Title"),
            self.header_cell("Rating"),
            self.header_cell("Overview"),
        ]);

        let (title_width, overview_width) = self.get_responsive_column_widths();

        for (index, movie) in movies.iter().enumerate() {
            let id = if self.use_colors {
                Cell::new(movie.id.to_string()).fg(Color::Cyan)
            } else {
                Cell::new(movie.id.to_string())
            };
            let overview = truncate_text_unicode(&single_line(&movie.description), overview_width);
            let overview = if self.use_colors {
                Cell::new(overview).fg(Color::DarkGrey)
            } else {
                Cell::new(overview)
            };

            table.add_row(vec![
                Cell::new(index + 1),
                id,
                Cell::new(truncate_text_unicode(&movie.title, title_width)),
                Cell::new(format!("{:.1}", movie.vote_average)),
                overview,
            ]);
        }

        table.to_string()
    }

    pub fn render_movie_details(&self, movie: &Movie) -> String {
        let mut table = self.new_table();
        table.set_header(vec![self.header_cell("Field"), self.header_cell("Value")]);

        table.add_row(vec![Cell::new("ID"), Cell::new(movie.id)]);
        table.add_row(vec![
            Cell::new("Title"),
            Cell::new(&movie.title).add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("Rating"),
            Cell::new(format_rating(movie.vote_average, movie.vote_count)),
        ]);
        table.add_row(vec![
            Cell::new("Poster"),
            Cell::new(movie.poster_path.as_deref().unwrap_or("N/A")),
        ]);
        table.add_row(vec![
            Cell::new("Overview"),
            Cell::new(single_line(&movie.description)),
        ]);

        table.to_string()
    }

    /// One-line summary of the list session under the table.
    pub fn render_list_status(&self, state: &MoviesState) -> String {
        let mut parts = vec![format!("{} movie(s)", state.movies.len())];

        let query = state.search_query.trim();
        if !query.is_empty() {
            parts.push(format!("search \"{}\"", query));
        }

        if state.is_loading {
            parts.push(format!("loading page {}...", state.current_page));
        } else if state.has_more_pages {
            parts.push(format!("next page {}", state.current_page));
        } else {
            parts.push("end of results".to_string());
        }

        parts.join(" | ")
    }

    /// Full render of the list screen: table, status line and error, if any.
    pub fn render_movies_screen(&self, state: &MoviesState) -> String {
        let mut output = self.render_movie_list(&state.movies);
        output.push('\n');
        output.push_str(&self.render_list_status(state));

        if let Some(error) = &state.error {
            output.push('\n');
            output.push_str(&self.render_data_error(error));
        }

        output
    }

    pub fn render_details_screen(&self, state: &MovieDetailsState) -> String {
        if state.is_loading {
            return "Loading movie...".to_string();
        }
        if let Some(error) = &state.error {
            return self.render_data_error(error);
        }
        match &state.movie {
            Some(movie) => self.render_movie_details(movie),
            None => "No movie loaded.".to_string(),
        }
    }

    /// Message and hint for a failed load, with a retry prompt when it may help.
    pub fn render_data_error(&self, error: &DataError) -> String {
        let mut output = format!("Error: {}", error);
        if let Some(hint) = error.troubleshooting_hint() {
            output.push_str(&format!("\nHint: {}", hint));
        }
        if error.is_retryable() {
            output.push_str("\nRetry available.");
        }
        output
    }

    pub fn render_app_error(&self, error: &AppError) -> String {
        let mut output = format!(
            "{} {}",
            error.severity().emoji(),
            error.display_friendly()
        );
        if let Some(hint) = error.troubleshooting_hint() {
            output.push_str(&format!("\n💡 {}", hint));
        }
        output
    }

    fn configure_table_width(&self, table: &mut Table) {
        let terminal_width = self.max_width.unwrap_or(80);
        let available_width = if terminal_width > 20 {
            terminal_width - 6
        } else {
            terminal_width.max(40)
        };
        table.set_width(available_width as u16);
    }

    /// (title, overview) column widths for the current terminal width.
    fn get_responsive_column_widths(&self) -> (usize, usize) {
        let terminal_width = self.max_width.unwrap_or(80);

        if terminal_width < 60 {
            (15, 12)
        } else if terminal_width < 80 {
            (20, 20)
        } else if terminal_width < 120 {
            (30, 35)
        } else {
            (40, 60)
        }
    }
}
