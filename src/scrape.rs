use tracing::{info, instrument, warn};

use crate::cache::Cache;
use crate::error::Result;
use crate::headlines::HeadlineCollector;
use crate::models::CategoryResult;
use crate::navigation::NavigationCollector;

/// Walks the navigation menu, collects every category's headlines and caches
/// the aggregate.
#[derive(Clone)]
pub struct Scraper {
    navigation: NavigationCollector,
    headlines: HeadlineCollector,
    cache: Cache,
}

impl Scraper {
    pub fn new(navigation: NavigationCollector, headlines: HeadlineCollector, cache: Cache) -> Self {
        Self {
            navigation,
            headlines,
            cache,
        }
    }

    /// Categories are scraped strictly in menu order, one at a time. The cached
    /// payload is replaced even when nothing was found.
    #[instrument(level = "info", skip(self))]
    pub async fn run(&self) -> Result<Vec<CategoryResult>> {
        let nav = self.navigation.collect().await;
        if nav.is_failed() {
            warn!("navigation unavailable, caching an empty result");
        }

        let mut results = Vec::new();
        for item in nav.into_items() {
            let headlines = self.headlines.collect(&item.link).await.into_items();
            results.push(CategoryResult {
                category: item.name,
                url: item.link,
                headlines,
            });
        }

        let payload = serde_json::to_string(&results)?;
        self.cache.replace(&payload).await?;
        info!(categories = results.len(), bytes = payload.len(), "scrape cached");

        Ok(results)
    }
}
