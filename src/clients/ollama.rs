use crate::config::OllamaSettings;
use crate::error::Result;
use crate::models::{Evaluation, RawListing};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

// Local models can take minutes per generation on large prompts.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(250);

#[derive(Debug)]
pub struct OllamaClient {
    client: Client,
    api_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    top_k: u32,
    top_p: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct Verdict {
    score: i64,
    #[serde(default = "not_available")]
    positives: String,
    #[serde(default = "not_available")]
    negatives: String,
}

fn not_available() -> String {
    "N/A".to_string()
}

impl OllamaClient {
    pub fn new(settings: &OllamaSettings) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            model: settings.model.clone(),
        })
    }

    /// Scores one listing against the investment rubric. Never fails:
    /// any transport or parse problem degrades to the fixed error
    /// Evaluation so one bad response cannot stop the pipeline.
    pub async fn evaluate(&self, listing: &RawListing) -> Evaluation {
        info!("Evaluating '{}' with model {}", listing.title, self.model);

        match self.request_evaluation(listing).await {
            Ok(evaluation) => {
                info!("Score for '{}': {}/10", listing.title, evaluation.score);
                evaluation
            }
            Err(e) => {
                warn!("Ollama request for '{}' failed: {}", listing.title, e);
                Evaluation::error_default()
            }
        }
    }

    async fn request_evaluation(&self, listing: &RawListing) -> Result<Evaluation> {
        let prompt = build_prompt(listing)?;
        let request = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
            options: GenerateOptions {
                temperature: 0.2,
                top_k: 40,
                top_p: 0.9,
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = response.json().await?;
        Ok(parse_evaluation(&body.response))
    }
}

pub fn build_prompt(listing: &RawListing) -> Result<String> {
    let data = serde_json::to_string_pretty(listing)?;

    Ok(format!(
        r#"Com base nos dados do seguinte imóvel de leilão, avalie sua atratividade e oportunidade de investimento em uma escala de 0 a 10, onde 0 é "nada interessante" e 10 é "extremamente interessante".

Considere os seguintes critérios:
- Preço: Um preço baixo em relação às características do imóvel é um ponto positivo.
- Descrição Completa: Clareza, detalhamento e ausência de problemas graves (dívidas excessivas, problemas estruturais) são positivos.
- Localização Detalhada: Precisão e potencial de valorização da área são importantes.
- Condições de Pagamento: Flexibilidade nas condições é um ponto positivo.

Dados do Imóvel:
{data}

Responda APENAS com um objeto JSON no seguinte formato:
{{
  "score": <número inteiro de 0 a 10>,
  "positives": "<Pontos positivos do imóvel em uma frase, separado por vírgulas se houver mais de um.>",
  "negatives": "<Pontos negativos do imóvel em uma frase, separado por vírgulas se houver mais de um.>"
}}"#
    ))
}

/// Parses the text the model generated. Anything other than a JSON
/// object with an integer score in [0, 10] yields the error default.
pub fn parse_evaluation(response_text: &str) -> Evaluation {
    let verdict: Verdict = match serde_json::from_str(response_text.trim()) {
        Ok(verdict) => verdict,
        Err(e) => {
            warn!("Model returned unusable JSON ({}): {:?}", e, response_text);
            return Evaluation::error_default();
        }
    };

    if !(0..=10).contains(&verdict.score) {
        warn!("Model returned out-of-range score {}", verdict.score);
        return Evaluation::error_default();
    }

    Evaluation {
        score: verdict.score,
        positives: verdict.positives,
        negatives: verdict.negatives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardSummary, DetailFields};

    fn listing() -> RawListing {
        RawListing::from_parts(
            CardSummary {
                title: "Casa X".to_string(),
                price: "R$ 100.000,00".to_string(),
                locality: "São Paulo - SP".to_string(),
                auction_number: "Leilão 123".to_string(),
                detail_link: "https://example.com/leilao/1".to_string(),
            },
            DetailFields::default(),
        )
    }

    #[test]
    fn parses_valid_response() {
        let evaluation = parse_evaluation(
            r#"{"score": 8, "positives": "Preço baixo", "negatives": "Ocupado"}"#,
        );
        assert_eq!(evaluation.score, 8);
        assert_eq!(evaluation.positives, "Preço baixo");
        assert_eq!(evaluation.negatives, "Ocupado");
    }

    #[test]
    fn tolerates_surrounding_whitespace_and_missing_text_fields() {
        let evaluation = parse_evaluation("  {\"score\": 5}  ");
        assert_eq!(evaluation.score, 5);
        assert_eq!(evaluation.positives, "N/A");
        assert_eq!(evaluation.negatives, "N/A");
    }

    #[test]
    fn invalid_json_yields_error_default() {
        assert_eq!(parse_evaluation("not json at all"), Evaluation::error_default());
        assert_eq!(parse_evaluation(""), Evaluation::error_default());
    }

    #[test]
    fn non_integer_score_yields_error_default() {
        assert_eq!(
            parse_evaluation(r#"{"score": 8.5, "positives": "a", "negatives": "b"}"#),
            Evaluation::error_default()
        );
        assert_eq!(
            parse_evaluation(r#"{"score": "8", "positives": "a", "negatives": "b"}"#),
            Evaluation::error_default()
        );
        assert_eq!(
            parse_evaluation(r#"{"positives": "a", "negatives": "b"}"#),
            Evaluation::error_default()
        );
    }

    #[test]
    fn out_of_range_score_yields_error_default() {
        assert_eq!(
            parse_evaluation(r#"{"score": 11, "positives": "a", "negatives": "b"}"#),
            Evaluation::error_default()
        );
        assert_eq!(
            parse_evaluation(r#"{"score": -1, "positives": "a", "negatives": "b"}"#),
            Evaluation::error_default()
        );
    }

    #[test]
    fn boundary_scores_are_accepted() {
        assert_eq!(parse_evaluation(r#"{"score": 0}"#).score, 0);
        assert_eq!(parse_evaluation(r#"{"score": 10}"#).score, 10);
    }

    #[test]
    fn prompt_embeds_the_listing_data() {
        let prompt = build_prompt(&listing()).unwrap();
        assert!(prompt.contains("\"titulo\": \"Casa X\""));
        assert!(prompt.contains("\"preco\": \"R$ 100.000,00\""));
        assert!(prompt.contains("Responda APENAS com um objeto JSON"));
    }
}
