use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Path to radar configuration file
    #[arg(long, default_value = "radar_config.json")]
    pub config_file: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Crawl all configured categories into the raw corpus file
    Crawl,
    /// Evaluate the raw corpus and store qualifying properties
    Process,
    /// Show stored properties, grouped or filtered by locality
    View {
        /// Locality to filter by (as shown on the listing page)
        #[arg(long)]
        locality: Option<String>,
        /// Re-run the full pipeline before reading the table
        #[arg(long)]
        refresh: bool,
    },
}
