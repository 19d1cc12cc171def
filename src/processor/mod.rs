use crate::clients::ollama::OllamaClient;
use crate::config::Config;
use crate::error::Result;
use pipeline::RadarPipeline;

mod pipeline;

pub struct Processor {
    pipeline: RadarPipeline,
}

impl Processor {
    pub fn new(config: Config) -> Result<Self> {
        config.ensure_directories()?;
        let ollama = OllamaClient::new(&config.radar.ollama)?;
        Ok(Self {
            pipeline: RadarPipeline::new(config.radar, config.http_client, ollama),
        })
    }

    pub async fn run(&self) -> Result<()> {
        self.pipeline.run_all().await
    }

    pub async fn crawl(&self) -> Result<()> {
        self.pipeline.crawl_all().await
    }

    pub async fn process(&self) -> Result<()> {
        self.pipeline.process_corpus().await
    }
}
