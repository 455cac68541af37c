use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::join_all;
use nw_core::{
    Article, ArticleStore, ArticleUpdate, BulkStatus, Result, SummaryMetadata, SummaryModel,
};
use tracing::{debug, error, info};

use crate::config::SummaryConfig;
use crate::worker::SummaryWorker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    Idle,
    Fetching,
    Processing,
    Writing,
}

/// Totals for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub total_processed: usize,
    pub batches: usize,
    pub elapsed: Duration,
}

impl RunReport {
    /// Articles per second over the whole run.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_processed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Drains the store of pending articles: batch fetch, concurrent
/// per-article summarization, one unordered bulk write per batch. Batches
/// run strictly one after another; a shutdown request takes effect at the
/// next batch boundary.
pub struct SummarizationPipeline {
    store: Arc<dyn ArticleStore>,
    worker: Arc<SummaryWorker>,
    config: SummaryConfig,
    shutdown: Arc<AtomicBool>,
}

impl SummarizationPipeline {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        model: Arc<dyn SummaryModel>,
        config: SummaryConfig,
    ) -> Self {
        let worker = Arc::new(SummaryWorker::new(model, config.clone()));
        Self {
            store,
            worker,
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag checked at batch boundaries; setting it stops the run after
    /// the in-flight batch has been written.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    pub async fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        let mut total_processed = 0usize;
        let mut batches = 0usize;
        let mut state = PipelineState::Idle;
        debug!(?state, "Pipeline starting");

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                info!("Shutdown requested, stopping at batch boundary");
                break;
            }

            state = PipelineState::Fetching;
            debug!(?state, "Fetching next batch");
            let articles = self.store.fetch_batch(self.config.batch_size).await?;
            if articles.is_empty() {
                break;
            }
            let batch_len = articles.len();

            state = PipelineState::Processing;
            debug!(?state, batch_len, "Summarizing batch");
            let updates = self.process_batch(articles).await;

            state = PipelineState::Writing;
            debug!(?state, "Writing batch results");
            let outcome = self.store.bulk_apply(updates).await?;
            if outcome.status == BulkStatus::Failed {
                error!(
                    "Bulk update failed: {}",
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
            }

            total_processed += batch_len;
            batches += 1;
            let elapsed = start.elapsed().as_secs_f64();
            info!(
                "Processed batch of {} articles ({} modified). Total: {}, rate: {:.2} articles/s",
                batch_len,
                outcome.modified_count,
                total_processed,
                total_processed as f64 / elapsed.max(f64::EPSILON),
            );
        }

        state = PipelineState::Idle;
        debug!(?state, "Pipeline loop finished");
        let report = RunReport {
            total_processed,
            batches,
            elapsed: start.elapsed(),
        };
        info!(
            "Pipeline completed. Total processed: {} articles in {} batches",
            report.total_processed, report.batches
        );
        Ok(report)
    }

    /// One update per article, in no particular order. Worker failures
    /// become `Failed` updates; they never abort the batch.
    async fn process_batch(&self, articles: Vec<Article>) -> Vec<ArticleUpdate> {
        let futures: Vec<_> = articles
            .into_iter()
            .map(|article| {
                let worker = self.worker.clone();
                async move {
                    match worker.summarize(&article.content).await {
                        Ok(summary) => ArticleUpdate::Summarized {
                            metadata: SummaryMetadata {
                                model: worker.model_name().to_string(),
                                version: worker.model_version().to_string(),
                                original_length: article.content.chars().count(),
                                summary_length: summary.chars().count(),
                            },
                            id: article.id,
                            summary,
                            summarized_at: Utc::now(),
                        },
                        Err(e) => {
                            error!("Failed to process article {}: {}", article.id, e);
                            ArticleUpdate::Failed {
                                id: article.id,
                                error: e.to_string(),
                                last_attempt: Utc::now(),
                            }
                        }
                    }
                }
            })
            .collect();

        join_all(futures).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nw_core::{BulkOutcome, DecodingParams, Error, Sentiment, SummaryStatus};
    use nw_storage::MemoryStorage;
    use std::fmt;
    use std::sync::atomic::AtomicUsize;
    use crate::config::BackoffPolicy;

    /// Succeeds unless the chunk mentions a poison word.
    struct ScriptedModel {
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0) }
        }
    }

    impl fmt::Debug for ScriptedModel {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("ScriptedModel").finish()
        }
    }

    #[async_trait]
    impl SummaryModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        fn version(&self) -> &str {
            "0.0"
        }

        async fn summarize_chunk(&self, text: &str, _params: &DecodingParams) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("poison") {
                Err(Error::Inference("model refused".to_string()))
            } else {
                Ok("a tidy summary".to_string())
            }
        }
    }

    /// Delegates to an inner store while counting calls.
    struct CountingStore {
        inner: MemoryStorage,
        fetches: AtomicUsize,
        bulk_applies: AtomicUsize,
        last_bulk_size: AtomicUsize,
    }

    impl CountingStore {
        fn new(inner: MemoryStorage) -> Self {
            Self {
                inner,
                fetches: AtomicUsize::new(0),
                bulk_applies: AtomicUsize::new(0),
                last_bulk_size: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ArticleStore for CountingStore {
        async fn store_article(&self, article: &Article) -> Result<()> {
            self.inner.store_article(article).await
        }

        async fn fetch_batch(&self, max_size: usize) -> Result<Vec<Article>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_batch(max_size).await
        }

        async fn bulk_apply(&self, updates: Vec<ArticleUpdate>) -> Result<BulkOutcome> {
            self.bulk_applies.fetch_add(1, Ordering::SeqCst);
            self.last_bulk_size.store(updates.len(), Ordering::SeqCst);
            self.inner.bulk_apply(updates).await
        }

        async fn get_article(&self, id: &str) -> Result<Option<Article>> {
            self.inner.get_article(id).await
        }

        async fn list_by_status(&self, status: SummaryStatus) -> Result<Vec<Article>> {
            self.inner.list_by_status(status).await
        }

        async fn count_by_status(&self, status: SummaryStatus) -> Result<u64> {
            self.inner.count_by_status(status).await
        }

        async fn fetch_unscored(&self, max_size: usize) -> Result<Vec<Article>> {
            self.inner.fetch_unscored(max_size).await
        }

        async fn set_sentiment(&self, id: &str, sentiment: &Sentiment) -> Result<()> {
            self.inner.set_sentiment(id, sentiment).await
        }
    }

    fn article(id: &str, content: &str) -> Article {
        Article::pending(id, format!("http://test.com/{}", id), "Test Article",
                         content, "test", Utc::now())
    }

    fn long_content(word: &str) -> String {
        format!("{} sentence filler words keep this over the length floor. ", word).repeat(5)
    }

    fn test_config() -> SummaryConfig {
        SummaryConfig {
            backoff: BackoffPolicy::Fixed(Duration::from_millis(1)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_one_batch_end_to_end() {
        let store = Arc::new(CountingStore::new(MemoryStorage::new()));
        store.store_article(&article("a", "")).await.unwrap();
        store.store_article(&article("b", &long_content("plain"))).await.unwrap();
        store.store_article(&article("c", &long_content("poison"))).await.unwrap();

        let pipeline = SummarizationPipeline::new(
            store.clone(),
            Arc::new(ScriptedModel::new()),
            test_config(),
        );
        let report = pipeline.run().await.unwrap();
        assert_eq!(report.total_processed, 3);
        assert_eq!(report.batches, 1);
        assert_eq!(store.bulk_applies.load(Ordering::SeqCst), 1);
        assert_eq!(store.last_bulk_size.load(Ordering::SeqCst), 3);

        // Empty content: success with an empty summary, no model metadata gaps.
        let a = store.get_article("a").await.unwrap().unwrap();
        assert_eq!(a.summary_status, SummaryStatus::Success);
        assert_eq!(a.summary.as_deref(), Some(""));
        assert_eq!(a.summary_metadata.unwrap().summary_length, 0);

        let b = store.get_article("b").await.unwrap().unwrap();
        assert_eq!(b.summary_status, SummaryStatus::Success);
        assert!(!b.summary.unwrap().is_empty());
        let metadata = b.summary_metadata.unwrap();
        assert_eq!(metadata.model, "scripted");
        assert!(metadata.original_length > 0);

        let c = store.get_article("c").await.unwrap().unwrap();
        assert_eq!(c.summary_status, SummaryStatus::Failed);
        assert!(!c.summary_error.unwrap().is_empty());
        assert!(c.last_attempt.is_some());
    }

    #[tokio::test]
    async fn test_loop_drains_store_and_counts_batches() {
        let store = Arc::new(CountingStore::new(MemoryStorage::new()));
        for i in 0..20 {
            store
                .store_article(&article(&format!("a{}", i), &long_content("plain")))
                .await
                .unwrap();
        }

        let config = SummaryConfig { batch_size: 8, ..test_config() };
        let pipeline = SummarizationPipeline::new(
            store.clone(),
            Arc::new(ScriptedModel::new()),
            config,
        );
        let report = pipeline.run().await.unwrap();

        // 8 + 8 + 4, then the empty fetch terminates the loop.
        assert_eq!(report.total_processed, 20);
        assert_eq!(report.batches, 3);
        assert_eq!(store.fetches.load(Ordering::SeqCst), 4);
        assert_eq!(store.bulk_applies.load(Ordering::SeqCst), 3);
        assert_eq!(store.count_by_status(SummaryStatus::Success).await.unwrap(), 20);
        assert_eq!(store.count_by_status(SummaryStatus::Pending).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_store_terminates_immediately() {
        let store = Arc::new(CountingStore::new(MemoryStorage::new()));
        let pipeline = SummarizationPipeline::new(
            store.clone(),
            Arc::new(ScriptedModel::new()),
            test_config(),
        );
        let report = pipeline.run().await.unwrap();
        assert_eq!(report.total_processed, 0);
        assert_eq!(report.batches, 0);
        assert_eq!(store.bulk_applies.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shutdown_honored_before_next_batch() {
        let store = Arc::new(CountingStore::new(MemoryStorage::new()));
        for i in 0..5 {
            store
                .store_article(&article(&format!("a{}", i), &long_content("plain")))
                .await
                .unwrap();
        }

        let pipeline = SummarizationPipeline::new(
            store.clone(),
            Arc::new(ScriptedModel::new()),
            test_config(),
        );
        pipeline.shutdown_handle().store(true, Ordering::SeqCst);

        let report = pipeline.run().await.unwrap();
        assert_eq!(report.total_processed, 0);
        assert_eq!(store.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(store.count_by_status(SummaryStatus::Pending).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_fatal_fetch_error_propagates() {
        struct BrokenStore;

        #[async_trait]
        impl ArticleStore for BrokenStore {
            async fn store_article(&self, _article: &Article) -> Result<()> {
                Ok(())
            }

            async fn fetch_batch(&self, _max_size: usize) -> Result<Vec<Article>> {
                Err(Error::Storage("connection reset".to_string()))
            }

            async fn bulk_apply(&self, _updates: Vec<ArticleUpdate>) -> Result<BulkOutcome> {
                Ok(BulkOutcome::success(0))
            }

            async fn get_article(&self, _id: &str) -> Result<Option<Article>> {
                Ok(None)
            }

            async fn list_by_status(&self, _status: SummaryStatus) -> Result<Vec<Article>> {
                Ok(Vec::new())
            }

            async fn count_by_status(&self, _status: SummaryStatus) -> Result<u64> {
                Ok(0)
            }

            async fn fetch_unscored(&self, _max_size: usize) -> Result<Vec<Article>> {
                Ok(Vec::new())
            }

            async fn set_sentiment(&self, _id: &str, _sentiment: &Sentiment) -> Result<()> {
                Ok(())
            }
        }

        let pipeline = SummarizationPipeline::new(
            Arc::new(BrokenStore),
            Arc::new(ScriptedModel::new()),
            test_config(),
        );
        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
