use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a fetched headline set stays fresh.
pub const NEWS_CACHE_TTL: Duration = Duration::from_secs(20 * 60);

const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("news provider error: {0}")]
    Provider(String),

    #[error("rate limit exceeded")]
    RateLimited,
}

/// Cached headline set with its fetch timestamp. Injected by the caller,
/// never a module-level singleton, so it can be reset between test runs
/// and shared or scoped however the host application wants.
#[derive(Debug, Default)]
pub struct NewsCache {
    entry: Option<(Vec<NewsItem>, Instant)>,
}

impl NewsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached items still inside `ttl`, if any.
    pub fn fresh(&self, ttl: Duration) -> Option<&[NewsItem]> {
        match &self.entry {
            Some((items, fetched_at)) if fetched_at.elapsed() < ttl => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Cached items regardless of age; the rate-limit fallback.
    pub fn stale(&self) -> Option<&[NewsItem]> {
        self.entry.as_ref().map(|(items, _)| items.as_slice())
    }

    pub fn store(&mut self, items: Vec<NewsItem>) {
        self.entry = Some((items, Instant::now()));
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

// NewsAPI response layout.
#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    status: String,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    title: Option<String>,
    url: Option<String>,
    source: Option<ArticleSource>,
    published_at: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

/// Thin client over the NewsAPI top-headlines endpoint (Indian business
/// news). Results go through the injected cache.
pub struct NewsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    ttl: Duration,
}

impl NewsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: "https://newsapi.org/v2".to_string(),
            ttl: NEWS_CACHE_TTL,
        }
    }

    /// Point at a different endpoint root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Top business headlines, served from cache while fresh. A rate-limited
    /// response falls back to stale cache contents when there are any.
    pub async fn top_headlines(&self, cache: &mut NewsCache) -> Result<Vec<NewsItem>, NewsError> {
        if let Some(items) = cache.fresh(self.ttl) {
            log::debug!("serving cached market news");
            return Ok(items.to_vec());
        }

        log::info!("fetching fresh market news");
        let url = format!(
            "{}/top-headlines?country=in&category=business&pageSize={}",
            self.base_url, PAGE_SIZE
        );
        let response = self
            .http
            .get(&url)
            .header("X-Api-Key", self.api_key.as_str())
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            if let Some(items) = cache.stale() {
                log::warn!("news provider rate limited; serving stale cache");
                return Ok(items.to_vec());
            }
            return Err(NewsError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(NewsError::Provider(format!("status {}", response.status())));
        }

        let body: HeadlinesResponse = response.json().await?;
        if body.status == "error" {
            return Err(NewsError::Provider(
                body.message.unwrap_or_else(|| "unknown provider error".to_string()),
            ));
        }

        let items: Vec<NewsItem> = body
            .articles
            .into_iter()
            .take(PAGE_SIZE)
            .map(|a| NewsItem {
                title: a.title.unwrap_or_default(),
                url: a.url.unwrap_or_default(),
                source: a
                    .source
                    .and_then(|s| s.name)
                    .unwrap_or_else(|| "News Source".to_string()),
                published_at: a.published_at,
                summary: a.description,
            })
            .collect();

        log::info!("fetched {} news items", items.len());
        cache.store(items.clone());
        Ok(items)
    }
}
