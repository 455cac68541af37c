use std::fmt;
use async_trait::async_trait;
use nw_core::{DecodingParams, Result, SummaryModel};

/// Offline fallback model: returns the leading sentences of the chunk,
/// truncated to the requested maximum length. Useful for local runs and
/// wiring tests without a model endpoint.
pub struct DummyModel;

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

#[async_trait]
impl SummaryModel for DummyModel {
    fn name(&self) -> &str {
        "dummy"
    }

    fn version(&self) -> &str {
        "0.1"
    }

    async fn summarize_chunk(&self, text: &str, params: &DecodingParams) -> Result<String> {
        let sentences: Vec<&str> = text
            .split(|c| c == '.' || c == '!' || c == '?')
            .filter(|s| !s.trim().is_empty())
            .take(3)
            .collect();

        let mut summary = sentences.join(". ");
        if !summary.is_empty() {
            summary.push('.');
        }
        // Truncation must land on a char boundary or non-ASCII text panics.
        if summary.chars().count() > params.max_length {
            summary = summary.chars().take(params.max_length).collect();
        }
        tracing::debug!("Generated summary from leading sentences: {}", summary);
        Ok(summary)
    }
}
