pub mod error;
pub mod model;
pub mod storage;
pub mod types;

pub use error::Error;
pub use model::{DecodingParams, SentimentModel, SummaryModel};
pub use storage::ArticleStore;
pub use types::{
    Article, ArticleUpdate, BulkOutcome, BulkStatus, Sentiment, SentimentLabel,
    SummaryMetadata, SummaryStatus,
};

pub type Result<T> = std::result::Result<T, Error>;
