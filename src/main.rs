use folio_cli::cli::commands::{handle_command, AppContext};
use folio_cli::cli::{Cli, Parser};
use folio_cli::db::get_database_path;
use folio_cli::utils::config::{get_config_path, load_config_from};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => get_config_path()?,
    };
    let config = load_config_from(&config_path)?;

    // Initialize logging
    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => get_database_path()?,
    };
    log::debug!("Using database {:?} and config {:?}", db_path, config_path);

    // Handle the command
    handle_command(
        cli,
        AppContext {
            db_path,
            config_path,
            config,
        },
    )
    .await
}
