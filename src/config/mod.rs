use crate::config::cli::Args;
use crate::error::Result;
use clap::Parser;
use reqwest::Client;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub mod cli;

/// One listing category with its own paginated base URL. The base URL
/// must end with the page-number query parameter so the page index can
/// be appended directly.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub name: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RadarConfig {
    pub categories: Vec<Category>,
    #[serde(default = "default_corpus_file")]
    pub corpus_file: PathBuf,
    #[serde(default = "default_database_file")]
    pub database_file: PathBuf,
    #[serde(default)]
    pub ollama: OllamaSettings,
    #[serde(default = "default_score_threshold")]
    pub score_threshold: i64,
    /// Politeness delay before each detail-page request, in milliseconds.
    #[serde(default = "default_detail_delay_ms")]
    pub detail_delay_ms: u64,
    /// Pause between scoring calls, in milliseconds.
    #[serde(default = "default_evaluation_pause_ms")]
    pub evaluation_pause_ms: u64,
}

fn default_api_url() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_model() -> String {
    "gemma3:27b".to_string()
}

fn default_corpus_file() -> PathBuf {
    PathBuf::from("data/leiloes_raspados_raw.json")
}

fn default_database_file() -> PathBuf {
    PathBuf::from("data/imoveis_interessantes.db")
}

fn default_score_threshold() -> i64 {
    7
}

fn default_detail_delay_ms() -> u64 {
    150
}

fn default_evaluation_pause_ms() -> u64 {
    1000
}

pub struct Config {
    pub args: Args,
    pub radar: RadarConfig,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        let args = Args::parse();
        let radar: RadarConfig = serde_json::from_str(&std::fs::read_to_string(&args.config_file)?)?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            args,
            radar,
            http_client,
        })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        for path in [&self.radar.corpus_file, &self.radar.database_file] {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }
        Ok(())
    }
}
