use std::sync::Arc;
use nw_core::{Error, Result, SentimentModel, SummaryModel};

pub mod bart;
pub mod dummy;
pub mod sentiment;

pub use bart::BartModel;
pub use dummy::DummyModel;
pub use sentiment::{LexiconModel, SstModel};

/// Build a summarization model by name. `model_url` overrides the hosted
/// model's endpoint and is ignored by the local fallback.
pub fn create_model(name: &str, model_url: Option<&str>) -> Result<Arc<dyn SummaryModel>> {
    match name {
        "bart" => Ok(Arc::new(BartModel::new(model_url)?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Inference(format!("Unknown model: {}", other))),
    }
}

/// Build a sentiment model by name. Same `model_url` convention as
/// `create_model`.
pub fn create_sentiment_model(name: &str, model_url: Option<&str>) -> Result<Arc<dyn SentimentModel>> {
    match name {
        "sst" => Ok(Arc::new(SstModel::new(model_url)?)),
        "lexicon" => Ok(Arc::new(LexiconModel::new())),
        other => Err(Error::Inference(format!("Unknown sentiment model: {}", other))),
    }
}
