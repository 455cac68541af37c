use async_trait::async_trait;
use crate::types::{Article, ArticleUpdate, BulkOutcome, Sentiment, SummaryStatus};
use crate::Result;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Store a newly scraped article. Upserts by id.
    async fn store_article(&self, article: &Article) -> Result<()>;

    /// Fetch up to `max_size` articles awaiting summarization, in store
    /// default order. An empty result is the pipeline's termination signal.
    async fn fetch_batch(&self, max_size: usize) -> Result<Vec<Article>>;

    /// Apply a batch of per-article updates in one unordered operation.
    /// Individual update failures do not abort the rest; a total store
    /// failure is reported in the outcome, not as an `Err`.
    async fn bulk_apply(&self, updates: Vec<ArticleUpdate>) -> Result<BulkOutcome>;

    /// Look up a single article by id.
    async fn get_article(&self, id: &str) -> Result<Option<Article>>;

    /// All articles with the given summary status.
    async fn list_by_status(&self, status: SummaryStatus) -> Result<Vec<Article>>;

    /// Count of articles with the given summary status.
    async fn count_by_status(&self, status: SummaryStatus) -> Result<u64>;

    /// Fetch up to `max_size` articles with no sentiment yet, in store
    /// default order.
    async fn fetch_unscored(&self, max_size: usize) -> Result<Vec<Article>>;

    /// Record the sentiment for one article.
    async fn set_sentiment(&self, id: &str, sentiment: &Sentiment) -> Result<()>;
}
