pub mod config;
pub mod pipeline;
pub mod preprocess;
pub mod sentiment;
pub mod worker;

pub use config::{BackoffPolicy, SummaryConfig};
pub use pipeline::{RunReport, SummarizationPipeline};
pub use sentiment::SentimentEnricher;
pub use worker::SummaryWorker;

pub mod prelude {
    pub use super::config::{BackoffPolicy, SummaryConfig};
    pub use super::pipeline::{RunReport, SummarizationPipeline};
    pub use super::sentiment::SentimentEnricher;
    pub use super::worker::SummaryWorker;
    pub use nw_core::{Article, ArticleStore, Result, SentimentModel, SummaryModel};
}
