use crate::error::Result;
use crate::models::RawListing;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Loads the corpus accumulated by previous crawl passes. A missing
/// file starts a fresh corpus; a corrupt file is logged and also
/// starts fresh rather than aborting the crawl.
pub fn load(path: &Path) -> Vec<RawListing> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => {
            info!("Corpus file {} not found, starting a new one", path.display());
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<RawListing>>(&contents) {
        Ok(listings) => {
            info!("Loaded {} existing listings from {}", listings.len(), path.display());
            listings
        }
        Err(e) => {
            warn!(
                "Corpus file {} is corrupt or empty ({}), starting a new one",
                path.display(),
                e
            );
            Vec::new()
        }
    }
}

/// Rewrites the whole corpus. The JSON is written to a sibling temp
/// file and renamed over the target, so a crash mid-write never leaves
/// a truncated corpus behind.
pub fn save(path: &Path, listings: &[RawListing]) -> Result<()> {
    let json = serde_json::to_string_pretty(listings)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardSummary, DetailFields};

    fn listing(title: &str, link: &str) -> RawListing {
        RawListing::from_parts(
            CardSummary {
                title: title.to_string(),
                price: "R$ 100.000,00".to_string(),
                locality: "São Paulo - SP".to_string(),
                auction_number: "Leilão 1".to_string(),
                detail_link: link.to_string(),
            },
            DetailFields::default(),
        )
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        assert!(load(&path).is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");

        let listings = vec![listing("Casa X", "https://example.com/1")];
        save(&path, &listings).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "Casa X");
        // no stray temp file left behind
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn second_pass_appends_without_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");

        // first crawl pass
        let mut corpus = load(&path);
        corpus.push(listing("Casa X", "https://example.com/1"));
        corpus.push(listing("Casa Y", "https://example.com/2"));
        save(&path, &corpus).unwrap();

        // second pass over the same path sees the old records and
        // appends fresh duplicates of the same logical listings
        let mut corpus = load(&path);
        corpus.push(listing("Casa X", "https://example.com/1"));
        save(&path, &corpus).unwrap();

        assert_eq!(load(&path).len(), 3);
    }
}
