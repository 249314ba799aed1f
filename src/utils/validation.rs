//! Input validation for command arguments and configuration values.

use crate::error::UtilsError;

pub const MAX_PAGES: u32 = 50;

type Result<T> = std::result::Result<T, UtilsError>;

fn invalid(message: String) -> UtilsError {
    UtilsError::Validation { message }
}

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(invalid("URL cannot be empty".to_string()));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(invalid(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        )));
    }

    if url.contains(char::is_whitespace) {
        return Err(invalid(format!("Invalid URL '{}': contains whitespace", url)));
    }

    Ok(())
}

/// Number of pages a single command may walk through.
pub fn validate_page_count(pages: u32) -> Result<u32> {
    if pages == 0 || pages > MAX_PAGES {
        return Err(invalid(format!(
            "Page count must be between 1 and {}, got {}",
            MAX_PAGES, pages
        )));
    }
    Ok(pages)
}

pub fn validate_movie_id(movie_id: i32) -> Result<i32> {
    if movie_id <= 0 {
        return Err(invalid(format!(
            "Movie id must be a positive number, got {}",
            movie_id
        )));
    }
    Ok(movie_id)
}

/// Parses a positive integer setting such as a timeout or debounce interval.
pub fn parse_positive_u64(field: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(invalid(format!("'{}' must be greater than zero", field))),
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(invalid(format!(
            "'{}' must be a whole number, got '{}'",
            field, value
        ))),
    }
}
