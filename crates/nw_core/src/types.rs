use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub url: String,
    pub title: String,
    pub content: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub summary: Option<String>,
    pub summary_status: SummaryStatus,
    pub summary_metadata: Option<SummaryMetadata>,
    pub summarized_at: Option<DateTime<Utc>>,
    pub last_attempt: Option<DateTime<Utc>>,
    pub summary_error: Option<String>,
    pub sentiment: Option<Sentiment>,
}

impl Article {
    /// A freshly scraped article, not yet seen by the summarization pipeline.
    pub fn pending(id: impl Into<String>, url: impl Into<String>, title: impl Into<String>,
                   content: impl Into<String>, source: impl Into<String>,
                   published_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            content: content.into(),
            source: source.into(),
            published_at,
            summary: None,
            summary_status: SummaryStatus::Pending,
            summary_metadata: None,
            summarized_at: None,
            last_attempt: None,
            summary_error: None,
            sentiment: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// Overall sentiment of an article. `score` is signed (-1.0 to 1.0, sign
/// follows the label), `confidence` is the model's own certainty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
    pub confidence: f64,
}

impl Sentiment {
    /// Scores within this band of zero are reported as neutral.
    pub const NEUTRAL_BAND: f64 = 0.1;

    pub fn neutral() -> Self {
        Self { label: SentimentLabel::Neutral, score: 0.0, confidence: 0.0 }
    }

    /// Classify a signed score, applying the neutral band.
    pub fn from_score(score: f64, confidence: f64) -> Self {
        let label = if score.abs() < Self::NEUTRAL_BAND {
            SentimentLabel::Neutral
        } else if score > 0.0 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        };
        Self { label, score, confidence }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    Pending,
    Success,
    Failed,
}

impl SummaryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStatus::Pending => "pending",
            SummaryStatus::Success => "success",
            SummaryStatus::Failed => "failed",
        }
    }
}

impl std::str::FromStr for SummaryStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SummaryStatus::Pending),
            "success" => Ok(SummaryStatus::Success),
            "failed" => Ok(SummaryStatus::Failed),
            other => Err(crate::Error::Storage(format!(
                "Unknown summary status: {}", other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetadata {
    pub model: String,
    pub version: String,
    pub original_length: usize,
    pub summary_length: usize,
}

/// A pending mutation for one article, produced by the worker step and
/// consumed by the bulk write. Moved into `bulk_apply` and discarded once
/// persisted.
#[derive(Debug, Clone)]
pub enum ArticleUpdate {
    Summarized {
        id: String,
        summary: String,
        metadata: SummaryMetadata,
        summarized_at: DateTime<Utc>,
    },
    Failed {
        id: String,
        error: String,
        last_attempt: DateTime<Utc>,
    },
}

impl ArticleUpdate {
    pub fn article_id(&self) -> &str {
        match self {
            ArticleUpdate::Summarized { id, .. } => id,
            ArticleUpdate::Failed { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkStatus {
    Success,
    Failed,
}

/// Result of one unordered bulk write. A total store failure is reported
/// here rather than as an `Err`; only connection-level fetch failures
/// abort a pipeline run.
#[derive(Debug, Clone)]
pub struct BulkOutcome {
    pub modified_count: u64,
    pub status: BulkStatus,
    pub error: Option<String>,
}

impl BulkOutcome {
    pub fn success(modified_count: u64) -> Self {
        Self { modified_count, status: BulkStatus::Success, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { modified_count: 0, status: BulkStatus::Failed, error: Some(error.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trip() {
        for status in [SummaryStatus::Pending, SummaryStatus::Success, SummaryStatus::Failed] {
            assert_eq!(SummaryStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(SummaryStatus::from_str("done").is_err());
    }

    #[test]
    fn test_pending_article_has_no_summary_fields() {
        let article = Article::pending(
            "http://test.com", "http://test.com", "Test", "content", "test",
            chrono::Utc::now(),
        );
        assert_eq!(article.summary_status, SummaryStatus::Pending);
        assert!(article.summary.is_none());
        assert!(article.summary_metadata.is_none());
        assert!(article.summary_error.is_none());
        assert!(article.sentiment.is_none());
    }

    #[test]
    fn test_sentiment_neutral_band() {
        assert_eq!(Sentiment::from_score(0.95, 0.95).label, SentimentLabel::Positive);
        assert_eq!(Sentiment::from_score(-0.7, 0.7).label, SentimentLabel::Negative);
        assert_eq!(Sentiment::from_score(0.05, 0.05).label, SentimentLabel::Neutral);
        assert_eq!(Sentiment::from_score(-0.09, 0.09).label, SentimentLabel::Neutral);
    }
}
