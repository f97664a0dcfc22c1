use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::browser::PageRenderer;
use crate::models::{resolve_link, Collected, HeadlineRecord};
use crate::published::TimeEstimator;

lazy_static! {
    static ref HEADING: Selector = Selector::parse("h3").unwrap();
    static ref ANCHOR: Selector = Selector::parse("a").unwrap();
}

/// Visible text of an element with whitespace runs collapsed.
fn visible_text(element: &ElementRef) -> String {
    let text = element.text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `(headline, link)` for every `h3` that has both text and a nested anchor
/// with a non-empty href, in document order.
pub fn extract_headlines(html: &str, origin: &str) -> Vec<(String, String)> {
    let document = Html::parse_document(html);

    document
        .select(&HEADING)
        .filter_map(|heading| {
            let text = visible_text(&heading);
            let href = heading
                .select(&ANCHOR)
                .next()
                .and_then(|a| a.value().attr("href"))
                .filter(|href| !href.is_empty())?;
            if text.is_empty() {
                return None;
            }
            Some((text, resolve_link(origin, href)))
        })
        .collect()
}

#[derive(Clone)]
pub struct HeadlineCollector {
    renderer: Arc<dyn PageRenderer>,
    estimator: TimeEstimator,
    origin: String,
    page_timeout: Duration,
}

impl HeadlineCollector {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        estimator: TimeEstimator,
        origin: &str,
        page_timeout: Duration,
    ) -> Self {
        Self {
            renderer,
            estimator,
            origin: origin.to_string(),
            page_timeout,
        }
    }

    /// Headlines of one category page, each annotated with its publish time.
    /// Articles are estimated one after another.
    #[instrument(level = "info", skip(self))]
    pub async fn collect(&self, category_url: &str) -> Collected<HeadlineRecord> {
        let html = match self.renderer.render(category_url, self.page_timeout).await {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, url = %category_url, "[Fetch H3 Error]");
                return Collected::Failed;
            }
        };

        let mut records = Vec::new();
        for (headline, link) in extract_headlines(&html, &self.origin) {
            let published = self.estimator.estimate(&link).await;
            records.push(HeadlineRecord {
                headline,
                link,
                published,
            });
        }

        info!(count = records.len(), "collected headlines");
        Collected::from_items(records)
    }
}
