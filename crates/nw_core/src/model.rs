use async_trait::async_trait;
use std::fmt;
use crate::types::Sentiment;
use crate::Result;

/// Decoding parameters forwarded verbatim to the summarization model.
#[derive(Debug, Clone)]
pub struct DecodingParams {
    pub max_length: usize,
    pub min_length: usize,
    pub sampling: bool,
    pub beam_count: usize,
    pub temperature: f64,
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self {
            max_length: 600,
            min_length: 50,
            sampling: false,
            beam_count: 4,
            temperature: 1.0,
        }
    }
}

/// An opaque text-in/text-out summarization model. Implementations hold no
/// per-call state, so one instance can serve concurrent callers.
#[async_trait]
pub trait SummaryModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    async fn summarize_chunk(&self, text: &str, params: &DecodingParams) -> Result<String>;
}

/// Scores the overall sentiment of an article's text. Empty or whitespace
/// input must come back neutral with zero confidence.
#[async_trait]
pub trait SentimentModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    async fn analyze(&self, text: &str) -> Result<Sentiment>;
}
