pub mod models;

pub use models::{create_model, create_sentiment_model};

pub mod prelude {
    pub use super::models::{create_model, create_sentiment_model};
    pub use nw_core::{DecodingParams, Error, Result, SentimentModel, SummaryModel};
}
