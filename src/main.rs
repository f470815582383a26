use clap::Parser;
use tracing_subscriber::EnvFilter;

use moodmentor::commands::{self, Command};
use moodmentor::config::{Cli, Config};
use moodmentor::db;
use moodmentor::state::AppState;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    let result = match cli.command {
        Command::Fmt(cmd) => commands::fmt::run(cmd, &config),
        command => {
            let db_path = config.db_path();
            tracing::debug!("Database: {}", db_path.display());

            let pool = db::create_pool(&db_path)?;
            db::run_migrations(&pool)?;

            let state = AppState { db: pool, config };
            commands::run(command, &state)
        }
    };

    match result {
        Ok(output) => {
            println!("{}", output.render()?);
            if output.exit_code != 0 {
                std::process::exit(output.exit_code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e.public_message());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
