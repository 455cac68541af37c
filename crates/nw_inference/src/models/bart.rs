use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use nw_core::{DecodingParams, Result, SummaryModel};

const MODEL_NAME: &str = "facebook/bart-large-cnn";
const MODEL_VERSION: &str = "1.0";
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Parameters {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
    num_beams: usize,
    temperature: f64,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    summary_text: String,
}

/// BART summarization served over HTTP with the Hugging Face inference
/// request shape. One chunk in, one summary out.
pub struct BartModel {
    client: Arc<Client>,
    base_url: String,
}

impl BartModel {
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
}

impl fmt::Debug for BartModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BartModel")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl SummaryModel for BartModel {
    fn name(&self) -> &str {
        MODEL_NAME
    }

    fn version(&self) -> &str {
        MODEL_VERSION
    }

    async fn summarize_chunk(&self, text: &str, params: &DecodingParams) -> Result<String> {
        let request = SummarizeRequest {
            inputs: text,
            parameters: Parameters {
                max_length: params.max_length,
                min_length: params.min_length,
                do_sample: params.sampling,
                num_beams: params.beam_count,
                temperature: params.temperature,
            },
        };

        let response = self.client
            .post(format!("{}/summarize", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<SummarizeResponse>>()
            .await?;

        response
            .into_iter()
            .next()
            .map(|r| r.summary_text)
            .ok_or_else(|| nw_core::Error::Inference("Empty response from summarization endpoint".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let model = BartModel::new(Some("http://models.internal:9000/")).unwrap();
        assert_eq!(model.base_url, "http://models.internal:9000");

        let model = BartModel::new(None).unwrap();
        assert_eq!(model.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_model_identity() {
        let model = BartModel::new(None).unwrap();
        assert_eq!(model.name(), "facebook/bart-large-cnn");
        assert_eq!(model.version(), "1.0");
    }
}
