use crate::error::{RadarError, Result};
use scraper::{ElementRef, Selector};

pub mod detail;
pub mod listing;

pub(crate) fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| RadarError::Selector(e.to_string()))
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
