use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "movie-catalog")]
#[command(about = "Browse and search a TMDB-style movie catalog from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// TMDB v4 read access token
    #[arg(long, global = true, env = "TMDB_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List popular movies
    List {
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// Search movies by title
    Search {
        /// Search text
        query: String,
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// Show a single movie
    Details {
        /// Movie ID
        id: i32,
    },
    /// Interactive browser reading commands from stdin
    Browse,
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set a value on the active profile
    Set {
        /// One of api_url, image_base_url, timeout_seconds, debounce_millis
        key: String,
        /// New value
        value: String,
    },
}
