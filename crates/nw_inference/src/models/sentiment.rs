use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use nw_core::{Result, Sentiment, SentimentModel};

const SST_MODEL_NAME: &str = "distilbert/distilbert-base-uncased-finetuned-sst-2-english";
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Serialize)]
struct SentimentRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct SentimentResponse {
    label: String,
    score: f64,
}

/// SST-2 sentiment classification served over HTTP with the Hugging Face
/// inference request shape. The binary POSITIVE/NEGATIVE output is folded
/// into one signed score, with a neutral band around zero.
pub struct SstModel {
    client: Arc<Client>,
    base_url: String,
}

impl SstModel {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(nw_core::Error::Http)?;
        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
        })
    }

    fn signed_score(label: &str, confidence: f64) -> f64 {
        if label.eq_ignore_ascii_case("positive") {
            confidence
        } else {
            -confidence
        }
    }
}

impl fmt::Debug for SstModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SstModel")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl SentimentModel for SstModel {
    fn name(&self) -> &str {
        SST_MODEL_NAME
    }

    async fn analyze(&self, text: &str) -> Result<Sentiment> {
        if text.trim().is_empty() {
            return Ok(Sentiment::neutral());
        }

        let response = self.client
            .post(format!("{}/sentiment", self.base_url))
            .json(&SentimentRequest { inputs: text })
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<SentimentResponse>>()
            .await?;

        let top = response
            .into_iter()
            .next()
            .ok_or_else(|| nw_core::Error::Inference("Empty response from sentiment endpoint".to_string()))?;

        Ok(Sentiment::from_score(Self::signed_score(&top.label, top.score), top.score))
    }
}

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "positive", "success", "successful", "win",
    "wins", "won", "growth", "improve", "improved", "strong", "record",
    "breakthrough", "celebrate", "agreement", "peace", "recovery",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "negative", "fail", "failure", "failed", "loss", "losses",
    "crisis", "decline", "weak", "attack", "death", "dead", "war", "conflict",
    "collapse", "fraud", "scandal", "disaster",
];

/// Offline fallback: scores text by counting hits against small positive and
/// negative word lists. Useful for local runs and wiring tests without a
/// model endpoint.
pub struct LexiconModel;

impl LexiconModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LexiconModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LexiconModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexiconModel").finish()
    }
}

#[async_trait]
impl SentimentModel for LexiconModel {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn analyze(&self, text: &str) -> Result<Sentiment> {
        let mut positive = 0usize;
        let mut negative = 0usize;
        for word in text.split_whitespace() {
            let word = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_ascii_lowercase();
            if POSITIVE_WORDS.contains(&word.as_str()) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(&word.as_str()) {
                negative += 1;
            }
        }

        let hits = positive + negative;
        if hits == 0 {
            return Ok(Sentiment::neutral());
        }
        let score = (positive as f64 - negative as f64) / hits as f64;
        Ok(Sentiment::from_score(score, score.abs()))
    }
}
