//! Access token lookup via the TMDB_ACCESS_TOKEN environment variable.

use std::env;

pub const ACCESS_TOKEN_ENV: &str = "TMDB_ACCESS_TOKEN";

/// Returns the value of TMDB_ACCESS_TOKEN if set and non-empty, otherwise None.
pub fn get_access_token() -> Option<String> {
    env::var(ACCESS_TOKEN_ENV)
        .ok()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Prefers an explicitly passed token over the environment.
pub fn resolve_access_token(explicit: Option<String>) -> Option<String> {
    explicit
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .or_else(get_access_token)
}
