use serde::{Deserialize, Serialize};

// Placeholder strings written into the corpus when a selector finds
// nothing. Kept in Portuguese so corpus files and the database stay
// compatible with data produced by earlier crawls.
pub const TITLE_NOT_FOUND: &str = "Título não encontrado";
pub const PRICE_NOT_FOUND: &str = "Preço não encontrado";
pub const MAIN_LOCALITY_NOT_FOUND: &str = "Localidade (principal) não encontrada";
pub const AUCTION_NUMBER_NOT_FOUND: &str = "Número do leilão não encontrado";
pub const LINK_NOT_FOUND: &str = "Link não encontrado";

/// Summary fields extracted from one auction card on a listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSummary {
    pub title: String,
    pub price: String,
    pub locality: String,
    pub auction_number: String,
    pub detail_link: String,
}

/// Supplementary fields extracted from a listing's detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailFields {
    #[serde(rename = "localizacao_detalhada")]
    pub detailed_locality: String,
    #[serde(rename = "vara")]
    pub court: String,
    #[serde(rename = "forum")]
    pub forum: String,
    #[serde(rename = "leiloeiro")]
    pub auctioneer: String,
    #[serde(rename = "descricao_completa")]
    pub full_description: String,
    #[serde(rename = "condicoes_pagamento")]
    pub payment_terms: String,
}

impl Default for DetailFields {
    fn default() -> Self {
        Self {
            detailed_locality: "Não encontrada".to_string(),
            court: "Não encontrada".to_string(),
            forum: "Não encontrado".to_string(),
            auctioneer: "Não encontrado".to_string(),
            full_description: "Não encontrada".to_string(),
            payment_terms: "Não encontradas".to_string(),
        }
    }
}

/// One fully merged listing as it lives in the raw corpus file. The
/// serde renames reproduce the corpus wire format exactly, with the
/// detail fields flattened next to the summary fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawListing {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "preco")]
    pub price: String,
    #[serde(rename = "localidade_pagina_principal")]
    pub locality: String,
    #[serde(rename = "numero_leilao")]
    pub auction_number: String,
    #[serde(rename = "link_detalhes")]
    pub detail_link: String,
    #[serde(flatten)]
    pub details: DetailFields,
}

impl RawListing {
    pub fn from_parts(card: CardSummary, details: DetailFields) -> Self {
        Self {
            title: card.title,
            price: card.price,
            locality: card.locality,
            auction_number: card.auction_number,
            detail_link: card.detail_link,
            details,
        }
    }
}

/// Scoring verdict for one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: i64,
    pub positives: String,
    pub negatives: String,
}

impl Evaluation {
    /// The fixed fallback returned whenever the scoring endpoint fails
    /// or answers with something unusable.
    pub fn error_default() -> Self {
        Self {
            score: 0,
            positives: "Erro na avaliação".to_string(),
            negatives: "Erro na avaliação".to_string(),
        }
    }
}
