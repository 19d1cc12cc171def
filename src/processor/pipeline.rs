use crate::clients::ollama::OllamaClient;
use crate::config::{Category, RadarConfig};
use crate::corpus;
use crate::error::{RadarError, Result};
use crate::models::RawListing;
use crate::scrapers::detail::{self, DetailSelectors};
use crate::scrapers::listing::{self, ListingSelectors};
use crate::store::{ConflictPolicy, PropertyStore};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

pub struct RadarPipeline {
    config: RadarConfig,
    client: Client,
    ollama: OllamaClient,
}

impl RadarPipeline {
    pub fn new(config: RadarConfig, client: Client, ollama: OllamaClient) -> Self {
        Self {
            config,
            client,
            ollama,
        }
    }

    /// Full run: for each configured category, crawl it and then
    /// evaluate whatever the shared corpus holds. Already-stored links
    /// are skipped on re-evaluation, so repeated passes only add rows.
    pub async fn run_all(&self) -> Result<()> {
        for category in &self.config.categories {
            self.crawl_category(category).await?;
            self.process_corpus().await?;
        }
        Ok(())
    }

    pub async fn crawl_all(&self) -> Result<()> {
        for category in &self.config.categories {
            self.crawl_category(category).await?;
        }
        Ok(())
    }

    /// Walks one category's listing pages, enriching each card with its
    /// detail page and appending everything to the corpus file. The
    /// corpus is checkpointed after every page so an interrupted crawl
    /// keeps what it already collected.
    pub async fn crawl_category(&self, category: &Category) -> Result<()> {
        info!("Crawling category '{}'", category.name);

        let listing_selectors = ListingSelectors::new()?;
        let detail_selectors = DetailSelectors::new()?;
        let detail_delay = Duration::from_millis(self.config.detail_delay_ms);

        let mut corpus = corpus::load(&self.config.corpus_file);
        let initial_count = corpus.len();

        let mut current_page: u32 = 1;
        let mut total_pages: u32 = 1;

        while current_page <= total_pages {
            info!(
                "Fetching page {} of {} for '{}'",
                current_page, total_pages, category.name
            );

            let page = match listing::fetch_page(
                &self.client,
                &category.base_url,
                current_page,
                &listing_selectors,
            )
            .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        "Failed to fetch page {} of '{}': {}. Ending this category.",
                        current_page, category.name, e
                    );
                    break;
                }
            };

            // The pagination summary is only trusted on the first page.
            if current_page == 1 {
                total_pages = page.total_pages;
                info!("Category '{}' reports {} page(s)", category.name, total_pages);
            }

            if page.cards.is_empty() {
                info!(
                    "Page {} of '{}' has no listings, stopping",
                    current_page, category.name
                );
                break;
            }

            for card in page.cards {
                info!("Found listing: '{}' ({})", card.title, card.price);
                let details = detail::fetch_details(
                    &self.client,
                    &card.detail_link,
                    &card.title,
                    detail_delay,
                    &detail_selectors,
                )
                .await;
                corpus.push(RawListing::from_parts(card, details));
            }

            corpus::save(&self.config.corpus_file, &corpus)?;
            info!(
                "Saved {} new listings so far for '{}' (corpus total {})",
                corpus.len() - initial_count,
                category.name,
                corpus.len()
            );

            current_page += 1;
        }

        corpus::save(&self.config.corpus_file, &corpus)?;
        info!(
            "Finished '{}': {} new listings, corpus now holds {}",
            category.name,
            corpus.len() - initial_count,
            corpus.len()
        );

        Ok(())
    }

    /// Scores every listing in the corpus and stores the ones at or
    /// above the configured threshold. Evaluation failures degrade to
    /// the error score and simply fall below the threshold.
    pub async fn process_corpus(&self) -> Result<()> {
        if !self.config.corpus_file.exists() {
            warn!(
                "Corpus file {} does not exist. Run the crawl first.",
                self.config.corpus_file.display()
            );
            return Ok(());
        }

        let listings = corpus::load(&self.config.corpus_file);
        if listings.is_empty() {
            info!("Corpus is empty, nothing to evaluate");
            return Ok(());
        }

        let store = PropertyStore::open(&self.config.database_file)?;
        let pause = Duration::from_millis(self.config.evaluation_pause_ms);

        info!(
            "Evaluating {} listings (threshold {})",
            listings.len(),
            self.config.score_threshold
        );

        let progress = ProgressBar::new(listings.len() as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
            )
            .map_err(|e| RadarError::Other(e.to_string()))?,
        );

        let mut stored = 0usize;
        let mut below_threshold = 0usize;

        for listing in &listings {
            progress.set_message(listing.title.clone());

            let evaluation = self.ollama.evaluate(listing).await;

            if evaluation.score >= self.config.score_threshold {
                match store.insert(listing, &evaluation, ConflictPolicy::IgnoreDuplicates) {
                    Ok(true) => stored += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Failed to store '{}': {}", listing.title, e);
                    }
                }
            } else {
                below_threshold += 1;
                info!(
                    "'{}' scored {} (below {}), not stored",
                    listing.title, evaluation.score, self.config.score_threshold
                );
            }

            sleep(pause).await;
            progress.inc(1);
        }

        progress.finish_with_message("done");
        info!(
            "Evaluation finished: {} stored, {} below threshold, {} total in database",
            stored,
            below_threshold,
            store.count()?
        );

        Ok(())
    }
}
