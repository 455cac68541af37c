use async_trait::async_trait;
use nw_core::{
    Article, ArticleStore, ArticleUpdate, BulkOutcome, Result, Sentiment, SummaryStatus,
};
use sqlx::{sqlite::SqlitePool, Row};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        url TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        source TEXT NOT NULL,
        published_at TEXT NOT NULL,
        summary TEXT,
        summary_status TEXT NOT NULL DEFAULT 'pending',
        summary_metadata TEXT,
        summarized_at TEXT,
        last_attempt TEXT,
        summary_error TEXT,
        sentiment TEXT
    )
    "#,
    // Add future migrations here
];

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

impl SqliteStorage {
    pub async fn new_with_path(db_path: &PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path.display()))
            .await
            .map_err(|e| nw_core::Error::Storage(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| nw_core::Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.clone(),
        })
    }

    pub fn get_db_path(&self) -> &PathBuf {
        &self.db_path
    }

    fn row_to_article(row: &sqlx::sqlite::SqliteRow) -> Result<Article> {
        let parse_date = |value: Option<String>| -> Result<Option<chrono::DateTime<chrono::Utc>>> {
            value
                .map(|s| {
                    chrono::DateTime::parse_from_rfc3339(&s)
                        .map(|d| d.with_timezone(&chrono::Utc))
                        .map_err(|e| nw_core::Error::Storage(format!("Failed to parse date: {}", e)))
                })
                .transpose()
        };

        let metadata = row
            .get::<Option<String>, _>("summary_metadata")
            .map(|s| serde_json::from_str(&s))
            .transpose()?;

        let sentiment = row
            .get::<Option<String>, _>("sentiment")
            .map(|s| serde_json::from_str(&s))
            .transpose()?;

        Ok(Article {
            id: row.get("id"),
            url: row.get("url"),
            title: row.get("title"),
            content: row.get("content"),
            source: row.get("source"),
            published_at: parse_date(Some(row.get::<String, _>("published_at")))?
                .ok_or_else(|| nw_core::Error::Storage("Missing published_at".to_string()))?,
            summary: row.get("summary"),
            summary_status: SummaryStatus::from_str(&row.get::<String, _>("summary_status"))?,
            summary_metadata: metadata,
            summarized_at: parse_date(row.get("summarized_at"))?,
            last_attempt: parse_date(row.get("last_attempt"))?,
            summary_error: row.get("summary_error"),
            sentiment,
        })
    }

    async fn apply_update(&self, update: &ArticleUpdate) -> Result<u64> {
        let result = match update {
            ArticleUpdate::Summarized { id, summary, metadata, summarized_at } => {
                let metadata = serde_json::to_string(metadata)?;
                sqlx::query(
                    r#"
                    UPDATE articles
                    SET summary = ?, summary_status = 'success',
                        summary_metadata = ?, summarized_at = ?, summary_error = NULL
                    WHERE id = ?
                    "#,
                )
                .bind(summary)
                .bind(metadata)
                .bind(summarized_at.to_rfc3339())
                .bind(id)
                .execute(&*self.pool)
                .await
            }
            ArticleUpdate::Failed { id, error, last_attempt } => {
                sqlx::query(
                    r#"
                    UPDATE articles
                    SET summary_status = 'failed', summary_error = ?, last_attempt = ?
                    WHERE id = ?
                    "#,
                )
                .bind(error)
                .bind(last_attempt.to_rfc3339())
                .bind(id)
                .execute(&*self.pool)
                .await
            }
        };

        result
            .map(|r| r.rows_affected())
            .map_err(|e| nw_core::Error::Storage(format!("Failed to apply update: {}", e)))
    }
}

#[async_trait]
impl ArticleStore for SqliteStorage {
    async fn store_article(&self, article: &Article) -> Result<()> {
        let metadata = article
            .summary_metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let sentiment = article
            .sentiment
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO articles
            (id, url, title, content, source, published_at, summary,
             summary_status, summary_metadata, summarized_at, last_attempt,
             summary_error, sentiment)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.id)
        .bind(&article.url)
        .bind(&article.title)
        .bind(&article.content)
        .bind(&article.source)
        .bind(article.published_at.to_rfc3339())
        .bind(article.summary.as_deref())
        .bind(article.summary_status.as_str())
        .bind(metadata)
        .bind(article.summarized_at.map(|d| d.to_rfc3339()))
        .bind(article.last_attempt.map(|d| d.to_rfc3339()))
        .bind(article.summary_error.as_deref())
        .bind(sentiment)
        .execute(&*self.pool)
        .await
        .map_err(|e| nw_core::Error::Storage(format!("Failed to store article: {}", e)))?;

        Ok(())
    }

    async fn fetch_batch(&self, max_size: usize) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM articles
            WHERE summary_status = 'pending'
            LIMIT ?
            "#,
        )
        .bind(max_size as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| nw_core::Error::Storage(format!("Failed to fetch batch: {}", e)))?;

        rows.iter().map(Self::row_to_article).collect()
    }

    async fn bulk_apply(&self, updates: Vec<ArticleUpdate>) -> Result<BulkOutcome> {
        let total = updates.len();
        let mut modified = 0u64;
        let mut last_error = None;

        for update in &updates {
            match self.apply_update(update).await {
                Ok(count) => modified += count,
                Err(e) => {
                    tracing::error!("Update for {} failed: {}", update.article_id(), e);
                    last_error = Some(e.to_string());
                }
            }
        }

        if modified == 0 && total > 0 {
            if let Some(error) = last_error {
                return Ok(BulkOutcome::failed(error));
            }
        }
        Ok(BulkOutcome::success(modified))
    }

    async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| nw_core::Error::Storage(format!("Failed to get article: {}", e)))?;

        row.as_ref().map(Self::row_to_article).transpose()
    }

    async fn list_by_status(&self, status: SummaryStatus) -> Result<Vec<Article>> {
        let rows = sqlx::query("SELECT * FROM articles WHERE summary_status = ?")
            .bind(status.as_str())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| nw_core::Error::Storage(format!("Failed to list articles: {}", e)))?;

        rows.iter().map(Self::row_to_article).collect()
    }

    async fn count_by_status(&self, status: SummaryStatus) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM articles WHERE summary_status = ?")
            .bind(status.as_str())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| nw_core::Error::Storage(format!("Failed to count articles: {}", e)))?;

        Ok(row.get::<i64, _>("n") as u64)
    }

    async fn fetch_unscored(&self, max_size: usize) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM articles
            WHERE sentiment IS NULL
            LIMIT ?
            "#,
        )
        .bind(max_size as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| nw_core::Error::Storage(format!("Failed to fetch unscored: {}", e)))?;

        rows.iter().map(Self::row_to_article).collect()
    }

    async fn set_sentiment(&self, id: &str, sentiment: &Sentiment) -> Result<()> {
        let payload = serde_json::to_string(sentiment)?;
        sqlx::query("UPDATE articles SET sentiment = ? WHERE id = ?")
            .bind(payload)
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(|e| nw_core::Error::Storage(format!("Failed to set sentiment: {}", e)))?;
        Ok(())
    }
}
