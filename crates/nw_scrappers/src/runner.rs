use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use nw_core::{Article, ArticleStore, Error, Result};
use scraper::{Html, Selector};
use tokio::sync::Semaphore;
use tracing::{info, warn};
use url::Url;

use crate::profiles::SelectorProfile;

const MAX_CONCURRENT_SCRAPES: usize = 10;

fn parse_selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| Error::Scraping(format!("Invalid selector '{}': {}", raw, e)))
}

/// Pull article links out of a listing page, resolved against the page URL
/// and filtered by the profile's link pattern. Order preserved, duplicates
/// dropped.
pub fn extract_article_urls(profile: &SelectorProfile, html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = parse_selector(profile.listing_selector)?;
    let base = Url::parse(profile.base_url)
        .map_err(|e| Error::Scraping(format!("Invalid base URL '{}': {}", profile.base_url, e)))?;

    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else { continue };
        let Ok(resolved) = base.join(href) else { continue };
        let url = resolved.to_string();
        if url.contains(profile.link_filter) && seen.insert(url.clone()) {
            urls.push(url);
        }
    }
    Ok(urls)
}

/// Parse one article page with the profile's selectors. The article URL
/// doubles as its identifier.
pub fn parse_article(profile: &SelectorProfile, url: &str, html: &str) -> Result<Article> {
    let document = Html::parse_document(html);

    let title = document
        .select(&parse_selector(profile.title_selector)?)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let content = document
        .select(&parse_selector(profile.content_selector)?)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if title.is_empty() || content.is_empty() {
        return Err(Error::Scraping(format!(
            "No article content found at {} for {}", url, profile.name
        )));
    }

    Ok(Article::pending(url, url, title, content, profile.name, Utc::now()))
}

/// Scrapes listing pages and article pages for a set of selector profiles,
/// storing new articles as pending work for the summarization pipeline.
pub struct ScrapeRunner {
    store: Arc<dyn ArticleStore>,
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
}

impl ScrapeRunner {
    pub fn new(store: Arc<dyn ArticleStore>) -> Self {
        Self {
            store,
            client: reqwest::Client::new(),
            semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_SCRAPES)),
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Scrape one article page and store it unless already present.
    /// Returns true when a new article was stored.
    async fn scrape_article(&self, profile: &SelectorProfile, url: &str) -> Result<bool> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Error::External(e.into()))?;

        if self.store.get_article(url).await?.is_some() {
            return Ok(false);
        }

        let html = self.fetch_page(url).await?;
        let article = parse_article(profile, url, &html)?;
        self.store.store_article(&article).await?;
        Ok(true)
    }

    /// Scrape a source's listing page and every discovered article.
    /// Returns the number of newly stored articles; per-article failures
    /// are logged and skipped.
    pub async fn scrape_source(&self, profile: &SelectorProfile) -> Result<usize> {
        info!("Scraping {} ({})", profile.name, profile.base_url);
        let listing = self.fetch_page(profile.base_url).await?;
        let urls = extract_article_urls(profile, &listing)?;
        info!("Found {} article links on {}", urls.len(), profile.name);

        let results = join_all(urls.iter().map(|url| async move {
            match self.scrape_article(profile, url).await {
                Ok(stored) => stored,
                Err(e) => {
                    warn!("Failed to scrape {}: {}", url, e);
                    false
                }
            }
        }))
        .await;

        let stored = results.into_iter().filter(|s| *s).count();
        info!("Stored {} new articles from {}", stored, profile.name);
        Ok(stored)
    }

    /// Scrape every profile in turn. A failing source does not stop the rest.
    pub async fn scrape_all(&self, profiles: &[SelectorProfile]) -> Result<usize> {
        let mut total = 0;
        for profile in profiles {
            match self.scrape_source(profile).await {
                Ok(stored) => total += stored,
                Err(e) => warn!("Source {} failed: {}", profile.name, e),
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nw_core::SummaryStatus;
    use nw_storage::MemoryStorage;

    fn test_profile() -> SelectorProfile {
        SelectorProfile {
            name: "Test Source",
            cli_name: "test",
            base_url: "https://news.example.com",
            listing_selector: "a.story",
            link_filter: "/articles/",
            title_selector: "h1",
            content_selector: "div.body p",
        }
    }

    #[test]
    fn test_extract_article_urls_filters_and_dedupes() {
        let html = r#"
            <html><body>
                <a class="story" href="/articles/one">One</a>
                <a class="story" href="/articles/two">Two</a>
                <a class="story" href="/articles/one">One again</a>
                <a class="story" href="/about">About</a>
                <a class="other" href="/articles/three">Three</a>
            </body></html>
        "#;
        let urls = extract_article_urls(&test_profile(), html).unwrap();
        assert_eq!(urls, vec![
            "https://news.example.com/articles/one",
            "https://news.example.com/articles/two",
        ]);
    }

    #[test]
    fn test_parse_article_joins_paragraphs() {
        let html = r#"
            <html><body>
                <h1> A Headline </h1>
                <div class="body">
                    <p>First paragraph.</p>
                    <p>Second paragraph.</p>
                </div>
            </body></html>
        "#;
        let article = parse_article(&test_profile(), "https://news.example.com/articles/one", html)
            .unwrap();
        assert_eq!(article.title, "A Headline");
        assert_eq!(article.content, "First paragraph.\nSecond paragraph.");
        assert_eq!(article.source, "Test Source");
        assert_eq!(article.id, article.url);
        assert_eq!(article.summary_status, SummaryStatus::Pending);
    }

    #[test]
    fn test_parse_article_rejects_empty_pages() {
        let html = "<html><body><h1>Title only</h1></body></html>";
        let result = parse_article(&test_profile(), "https://news.example.com/articles/one", html);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_scrape_runner_wires_a_store() {
        // No network here: just check the runner holds the injected store.
        let store: Arc<dyn ArticleStore> = Arc::new(MemoryStorage::new());
        let _runner = ScrapeRunner::new(store.clone());
        assert_eq!(store.count_by_status(SummaryStatus::Pending).await.unwrap(), 0);
    }
}
