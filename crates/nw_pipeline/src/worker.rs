use std::sync::Arc;
use nw_core::{Error, Result, SummaryModel};
use tracing::warn;

use crate::config::SummaryConfig;
use crate::preprocess::{chunk, clean};

/// Summarizes one article's text: clean, chunk, one model call per chunk,
/// join. Retries a failed attempt up to `config.retry_attempts` times with
/// the configured backoff. Holds no mutable state, so a batch can call it
/// concurrently through an `Arc`.
pub struct SummaryWorker {
    model: Arc<dyn SummaryModel>,
    config: SummaryConfig,
}

impl SummaryWorker {
    pub fn new(model: Arc<dyn SummaryModel>, config: SummaryConfig) -> Self {
        Self { model, config }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn model_version(&self) -> &str {
        self.model.version()
    }

    pub async fn summarize(&self, text: &str) -> Result<String> {
        let cleaned = clean(text);
        if cleaned.is_empty() {
            // Too short to summarize; not an error.
            return Ok(String::new());
        }

        let chunks = chunk(&cleaned, self.config.chunk_size);
        let params = self.config.decoding_params();
        let mut last_error = String::from("no attempts made");

        for attempt in 0..self.config.retry_attempts {
            match self.summarize_chunks(&chunks, &params).await {
                Ok(summary) => return Ok(summary),
                Err(e) => {
                    warn!("Attempt {} failed: {}", attempt + 1, e);
                    last_error = e.to_string();
                    if attempt + 1 < self.config.retry_attempts {
                        tokio::time::sleep(self.config.backoff.delay(attempt)).await;
                    }
                }
            }
        }

        Err(Error::Summarization(format!(
            "All retry attempts failed: {}", last_error
        )))
    }

    async fn summarize_chunks(
        &self,
        chunks: &[String],
        params: &nw_core::DecodingParams,
    ) -> Result<String> {
        let mut summaries = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            summaries.push(self.model.summarize_chunk(chunk, params).await?);
        }
        Ok(summaries.join(" "))
    }
}
