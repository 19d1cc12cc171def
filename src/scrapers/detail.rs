use super::{element_text, parse_selector};
use crate::error::Result;
use crate::models::{self, DetailFields};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

pub struct DetailSelectors {
    locality: Selector,
    jurisdiction: Selector,
    forum: Selector,
    author: Selector,
    description: Selector,
    contract: Selector,
}

impl DetailSelectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            locality: parse_selector("div.locality div.value")?,
            jurisdiction: parse_selector("div.jurisdiction div.value")?,
            forum: parse_selector("div.forum div.value")?,
            author: parse_selector("div.author div.value")?,
            description: parse_selector("div#tab-description div.content")?,
            contract: parse_selector("div#tab-contract div.content")?,
        })
    }
}

/// Fetches the supplementary fields for one listing. A missing or
/// placeholder link short-circuits to the defaults without any request;
/// request or parse failures degrade to the defaults as well, so this
/// never ends a crawl pass.
pub async fn fetch_details(
    client: &Client,
    detail_url: &str,
    title: &str,
    delay: Duration,
    selectors: &DetailSelectors,
) -> DetailFields {
    if detail_url.is_empty() || detail_url == models::LINK_NOT_FOUND {
        info!("No detail link available for '{}'", title);
        return DetailFields::default();
    }

    info!("Visiting detail page for '{}': {}", title, detail_url);
    sleep(delay).await;

    match request_details(client, detail_url, selectors).await {
        Ok(details) => details,
        Err(e) => {
            warn!("Failed to fetch details for '{}': {}", title, e);
            DetailFields::default()
        }
    }
}

async fn request_details(
    client: &Client,
    detail_url: &str,
    selectors: &DetailSelectors,
) -> Result<DetailFields> {
    let body = client
        .get(detail_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(parse_detail_page(&body, selectors))
}

pub fn parse_detail_page(html: &str, selectors: &DetailSelectors) -> DetailFields {
    let document = Html::parse_document(html);
    let mut details = DetailFields::default();

    if let Some(element) = document.select(&selectors.locality).next() {
        details.detailed_locality = element_text(element);
    }
    if let Some(element) = document.select(&selectors.jurisdiction).next() {
        details.court = element_text(element);
    }
    if let Some(element) = document.select(&selectors.forum).next() {
        details.forum = element_text(element);
    }
    if let Some(element) = document.select(&selectors.author).next() {
        details.auctioneer = element_text(element);
    }
    if let Some(element) = document.select(&selectors.description).next() {
        details.full_description = block_text(element);
    }
    if let Some(element) = document.select(&selectors.contract).next() {
        details.payment_terms = block_text(element);
    }

    details
}

// Long-text blocks keep one line per text fragment, mirroring how the
// site lays the description out across nested elements.
fn block_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors() -> DetailSelectors {
        DetailSelectors::new().unwrap()
    }

    const FULL_PAGE: &str = r#"<html><body>
        <div class="locality"><div class="value">Rua das Flores, 100 - Centro</div></div>
        <div class="jurisdiction"><div class="value">3ª Vara Cível</div></div>
        <div class="forum"><div class="value">Fórum João Mendes</div></div>
        <div class="author"><div class="value">Leiloeiro Oficial</div></div>
        <div id="tab-description"><div class="content"><p>Casa com 3 quartos.</p><p>Quintal amplo.</p></div></div>
        <div id="tab-contract" class="tab-pane"><div class="content">Pagamento em até 30 parcelas.</div></div>
    </body></html>"#;

    #[test]
    fn extracts_all_detail_fields() {
        let details = parse_detail_page(FULL_PAGE, &selectors());
        assert_eq!(details.detailed_locality, "Rua das Flores, 100 - Centro");
        assert_eq!(details.court, "3ª Vara Cível");
        assert_eq!(details.forum, "Fórum João Mendes");
        assert_eq!(details.auctioneer, "Leiloeiro Oficial");
        assert_eq!(details.full_description, "Casa com 3 quartos.\nQuintal amplo.");
        assert_eq!(details.payment_terms, "Pagamento em até 30 parcelas.");
    }

    #[test]
    fn missing_fields_keep_placeholder_defaults() {
        let html = r#"<html><body>
            <div class="locality"><div class="value">Av. Central, 1</div></div>
        </body></html>"#;

        let details = parse_detail_page(html, &selectors());
        assert_eq!(details.detailed_locality, "Av. Central, 1");
        assert_eq!(details.court, "Não encontrada");
        assert_eq!(details.forum, "Não encontrado");
        assert_eq!(details.auctioneer, "Não encontrado");
        assert_eq!(details.full_description, "Não encontrada");
        assert_eq!(details.payment_terms, "Não encontradas");
    }

    #[tokio::test]
    async fn placeholder_link_returns_defaults_without_request() {
        let client = Client::new();
        let selectors = selectors();

        let details = fetch_details(
            &client,
            models::LINK_NOT_FOUND,
            "Casa X",
            Duration::from_secs(0),
            &selectors,
        )
        .await;
        assert_eq!(details, DetailFields::default());

        let details = fetch_details(&client, "", "Casa X", Duration::from_secs(0), &selectors).await;
        assert_eq!(details, DetailFields::default());
    }
}
