use clap::Parser;
use log::debug;
use movie_catalog::cli::dispatcher::Dispatcher;
use movie_catalog::cli::main_types::Cli;
use movie_catalog::display::TableDisplay;
use movie_catalog::storage::config::Config;
use movie_catalog::storage::credentials::resolve_access_token;
use movie_catalog::utils::logging::init_logger;
use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config_path = match Config::config_file_path(cli.config_dir.as_deref().map(Path::new)) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("Error locating config: {}", err);
            std::process::exit(1);
        }
    };

    let config = match Config::load(Some(config_path.clone())) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    let profile_name = config.active_profile_name(cli.profile.as_deref());
    debug!("using profile {}", profile_name);

    let access_token = resolve_access_token(cli.access_token);
    let mut dispatcher = Dispatcher::new(config, config_path, profile_name, access_token);

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        eprintln!("{}", TableDisplay::new().render_app_error(&e));
        std::process::exit(1);
    }
}
