use std::error::Error;

use clap::Parser;
use log::info;

use feedback_board::api::http;
use feedback_board::cli::{seed, Cli, CliCmd};
use feedback_board::BoardConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = BoardConfig::load(&cli)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();

    match cli.command() {
        CliCmd::Serve => http::serve(config).await?,
        CliCmd::Seed { count } => {
            let created = seed::run(&config, count)?;
            info!("inserted {} sample comments into {}", created.len(), config.db_path.display());
        }
    }
    Ok(())
}
