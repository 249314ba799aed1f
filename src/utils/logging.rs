use env_logger::{Builder, Env};

/// Default filter when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "movie_catalog=debug,warn"
    } else {
        "movie_catalog=warn"
    }
}

/// Installs the global logger. `RUST_LOG` overrides the level chosen by `verbose`.
///
/// Calling it twice is harmless; the second installation is ignored.
pub fn init_logger(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let result = Builder::from_env(env)
        .format_timestamp_millis()
        .format_target(verbose)
        .try_init();

    if result.is_err() {
        log::debug!("logger already initialized");
    }
}
