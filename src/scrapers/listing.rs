use super::{element_text, parse_selector};
use crate::error::Result;
use crate::models::{self, CardSummary};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

static PAGE_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"Página \d+ de (\d+)").unwrap());

pub struct ListingSelectors {
    summary: Selector,
    card: Selector,
    title: Selector,
    price: Selector,
    locality: Selector,
    number: Selector,
}

impl ListingSelectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            summary: parse_selector("div.summary")?,
            card: parse_selector("div.card-content")?,
            title: parse_selector("a.card-title")?,
            price: parse_selector("div.card-price")?,
            locality: parse_selector("a.card-locality")?,
            number: parse_selector("div.card-number")?,
        })
    }
}

pub struct ListingPage {
    pub cards: Vec<CardSummary>,
    pub total_pages: u32,
}

/// Fetches one listing page. Network and HTTP-status errors propagate
/// to the caller; a failed listing page ends the crawl pass.
pub async fn fetch_page(
    client: &Client,
    base_url: &str,
    page: u32,
    selectors: &ListingSelectors,
) -> Result<ListingPage> {
    let url = format!("{}{}", base_url, page);
    let body = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(parse_listing_page(&body, selectors))
}

pub fn parse_listing_page(html: &str, selectors: &ListingSelectors) -> ListingPage {
    let document = Html::parse_document(html);
    let total_pages = total_pages(&document, selectors);
    let cards = document
        .select(&selectors.card)
        .map(|card| extract_card(card, selectors))
        .collect();

    ListingPage { cards, total_pages }
}

fn total_pages(document: &Html, selectors: &ListingSelectors) -> u32 {
    document
        .select(&selectors.summary)
        .next()
        .and_then(|summary| {
            let text = summary.text().collect::<String>();
            PAGE_COUNT
                .captures(&text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
        .unwrap_or(1)
}

fn extract_card(card: ElementRef<'_>, selectors: &ListingSelectors) -> CardSummary {
    let title_tag = card.select(&selectors.title).next();

    CardSummary {
        title: title_tag
            .map(element_text)
            .unwrap_or_else(|| models::TITLE_NOT_FOUND.to_string()),
        price: card
            .select(&selectors.price)
            .next()
            .map(element_text)
            .unwrap_or_else(|| models::PRICE_NOT_FOUND.to_string()),
        locality: card
            .select(&selectors.locality)
            .next()
            .map(element_text)
            .unwrap_or_else(|| models::MAIN_LOCALITY_NOT_FOUND.to_string()),
        auction_number: card
            .select(&selectors.number)
            .next()
            .map(element_text)
            .unwrap_or_else(|| models::AUCTION_NUMBER_NOT_FOUND.to_string()),
        detail_link: title_tag
            .and_then(|tag| tag.value().attr("href"))
            .map(str::to_string)
            .unwrap_or_else(|| models::LINK_NOT_FOUND.to_string()),
    }
}
