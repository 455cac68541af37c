use async_trait::async_trait;
use nw_core::{
    Article, ArticleStore, ArticleUpdate, BulkOutcome, Result, Sentiment, SummaryStatus,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory store. Insertion order doubles as the store's default fetch
/// order, which keeps batch fetches deterministic in tests.
pub struct MemoryStorage {
    articles: Arc<RwLock<Vec<Article>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self { articles: Arc::new(RwLock::new(Vec::new())) }
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleStore for MemoryStorage {
    async fn store_article(&self, article: &Article) -> Result<()> {
        let mut articles = self.articles.write().await;
        if let Some(existing) = articles.iter_mut().find(|a| a.id == article.id) {
            *existing = article.clone();
        } else {
            articles.push(article.clone());
        }
        Ok(())
    }

    async fn fetch_batch(&self, max_size: usize) -> Result<Vec<Article>> {
        let articles = self.articles.read().await;
        Ok(articles
            .iter()
            .filter(|a| a.summary_status == SummaryStatus::Pending)
            .take(max_size)
            .cloned()
            .collect())
    }

    async fn bulk_apply(&self, updates: Vec<ArticleUpdate>) -> Result<BulkOutcome> {
        let mut articles = self.articles.write().await;
        let mut modified = 0u64;
        for update in updates {
            let Some(article) = articles.iter_mut().find(|a| a.id == update.article_id()) else {
                // Unordered semantics: a missing target skips this update only.
                tracing::warn!("bulk_apply target not found: {}", update.article_id());
                continue;
            };
            match update {
                ArticleUpdate::Summarized { summary, metadata, summarized_at, .. } => {
                    article.summary = Some(summary);
                    article.summary_status = SummaryStatus::Success;
                    article.summary_metadata = Some(metadata);
                    article.summarized_at = Some(summarized_at);
                    article.summary_error = None;
                }
                ArticleUpdate::Failed { error, last_attempt, .. } => {
                    article.summary_status = SummaryStatus::Failed;
                    article.summary_error = Some(error);
                    article.last_attempt = Some(last_attempt);
                }
            }
            modified += 1;
        }
        Ok(BulkOutcome::success(modified))
    }

    async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        let articles = self.articles.read().await;
        Ok(articles.iter().find(|a| a.id == id).cloned())
    }

    async fn list_by_status(&self, status: SummaryStatus) -> Result<Vec<Article>> {
        let articles = self.articles.read().await;
        Ok(articles.iter().filter(|a| a.summary_status == status).cloned().collect())
    }

    async fn count_by_status(&self, status: SummaryStatus) -> Result<u64> {
        let articles = self.articles.read().await;
        Ok(articles.iter().filter(|a| a.summary_status == status).count() as u64)
    }

    async fn fetch_unscored(&self, max_size: usize) -> Result<Vec<Article>> {
        let articles = self.articles.read().await;
        Ok(articles
            .iter()
            .filter(|a| a.sentiment.is_none())
            .take(max_size)
            .cloned()
            .collect())
    }

    async fn set_sentiment(&self, id: &str, sentiment: &Sentiment) -> Result<()> {
        let mut articles = self.articles.write().await;
        if let Some(article) = articles.iter_mut().find(|a| a.id == id) {
            article.sentiment = Some(sentiment.clone());
        } else {
            tracing::warn!("set_sentiment target not found: {}", id);
        }
        Ok(())
    }
}
