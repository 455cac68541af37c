use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use nw_core::{Article, ArticleStore, Result, Sentiment, SentimentModel};
use tracing::{debug, info, warn};

use crate::pipeline::RunReport;

/// Walks the store scoring articles that have no sentiment yet, one batch
/// at a time. A model failure still writes a neutral score, otherwise the
/// failing article would be refetched on every pass.
pub struct SentimentEnricher {
    store: Arc<dyn ArticleStore>,
    model: Arc<dyn SentimentModel>,
    batch_size: usize,
    shutdown: Arc<AtomicBool>,
}

impl SentimentEnricher {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        model: Arc<dyn SentimentModel>,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            model,
            batch_size,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag checked at batch boundaries, same contract as the
    /// summarization pipeline's handle.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    pub async fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        let mut total_processed = 0usize;
        let mut batches = 0usize;

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                info!("Shutdown requested, stopping at batch boundary");
                break;
            }

            let articles = self.store.fetch_unscored(self.batch_size).await?;
            if articles.is_empty() {
                break;
            }
            let batch_len = articles.len();
            debug!(batch_len, "Scoring sentiment for batch");

            for (id, sentiment) in self.score_batch(articles).await {
                self.store.set_sentiment(&id, &sentiment).await?;
            }

            total_processed += batch_len;
            batches += 1;
            info!(
                "Scored batch of {} articles. Total: {}",
                batch_len, total_processed
            );
        }

        let report = RunReport {
            total_processed,
            batches,
            elapsed: start.elapsed(),
        };
        info!(
            "Sentiment pass completed. Total scored: {} articles in {} batches",
            report.total_processed, report.batches
        );
        Ok(report)
    }

    async fn score_batch(&self, articles: Vec<Article>) -> Vec<(String, Sentiment)> {
        let futures: Vec<_> = articles
            .into_iter()
            .map(|article| {
                let model = self.model.clone();
                async move {
                    let sentiment = match model.analyze(&article.content).await {
                        Ok(sentiment) => sentiment,
                        Err(e) => {
                            warn!("Sentiment analysis failed for {}: {}", article.id, e);
                            Sentiment::neutral()
                        }
                    };
                    (article.id, sentiment)
                }
            })
            .collect();

        join_all(futures).await
    }
}
