use anyhow::{Context, Result};

use crate::news::{NewsCache, NewsClient};

/// Fetch Indian business headlines. The cache is scoped to the invocation
/// here; a host process would keep one alive across requests.
pub async fn run() -> Result<()> {
    let api_key = std::env::var("NEWSAPI_API_KEY")
        .context("NEWSAPI_API_KEY is not set; get a key from newsapi.org")?;

    let client = NewsClient::new(api_key);
    let mut cache = NewsCache::new();
    let items = client
        .top_headlines(&mut cache)
        .await
        .context("failed to fetch market news")?;

    if items.is_empty() {
        println!("No headlines available right now.");
        return Ok(());
    }

    for item in items {
        println!("- {} ({})", item.title, item.source);
        if let Some(summary) = item.summary {
            println!("    {summary}");
        }
        println!("    {}", item.url);
    }
    Ok(())
}
