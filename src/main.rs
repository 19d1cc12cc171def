use leilao_radar::config::cli::Command;
use leilao_radar::config::Config;
use leilao_radar::error::Result;
use leilao_radar::processor::Processor;
use leilao_radar::store::PropertyStore;
use leilao_radar::viewer;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;

    let level: Level = config.args.log_level.parse().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    match config.args.command.clone() {
        None => {
            Processor::new(config)?.run().await?;
            info!("Pipeline completed successfully!");
        }
        Some(Command::Crawl) => {
            Processor::new(config)?.crawl().await?;
        }
        Some(Command::Process) => {
            Processor::new(config)?.process().await?;
        }
        Some(Command::View { locality, refresh }) => {
            let database_file = config.radar.database_file.clone();
            if refresh {
                Processor::new(config)?.run().await?;
            }
            let store = PropertyStore::open(&database_file)?;
            viewer::render(&store, locality.as_deref())?;
        }
    }

    Ok(())
}
