use lazy_static::lazy_static;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::browser::PageRenderer;
use crate::models::{resolve_link, Collected, NavLink};

lazy_static! {
    static ref NAV: Selector = Selector::parse("nav").unwrap();
    static ref LINK: Selector = Selector::parse("a[href]").unwrap();
}

/// Anchors of the first `<nav>` region, in document order. The name is the
/// anchor's text fragments, each trimmed, joined without separator.
pub fn extract_nav_links(html: &str, origin: &str) -> Vec<NavLink> {
    let document = Html::parse_document(html);
    let Some(nav) = document.select(&NAV).next() else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for anchor in nav.select(&LINK) {
        let href = anchor.value().attr("href").unwrap_or_default();
        let name: String = anchor.text().map(str::trim).collect();
        debug!(%href, %name, "nav anchor");
        if name.is_empty() || href.is_empty() {
            continue;
        }
        links.push(NavLink {
            name,
            link: resolve_link(origin, href),
        });
    }
    links
}

#[derive(Clone)]
pub struct NavigationCollector {
    renderer: Arc<dyn PageRenderer>,
    origin: String,
    page_timeout: Duration,
}

impl NavigationCollector {
    pub fn new(renderer: Arc<dyn PageRenderer>, origin: &str, page_timeout: Duration) -> Self {
        Self {
            renderer,
            origin: origin.to_string(),
            page_timeout,
        }
    }

    #[instrument(level = "info", skip(self), fields(origin = %self.origin))]
    pub async fn collect(&self) -> Collected<NavLink> {
        match self.renderer.render(&self.origin, self.page_timeout).await {
            Ok(html) => {
                let links = extract_nav_links(&html, &self.origin);
                info!(count = links.len(), "collected navigation links");
                Collected::from_items(links)
            }
            Err(e) => {
                error!(error = %e, "[Fetch Navbar Error]");
                Collected::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ORIGIN: &str = "https://www.prothomalo.com";

    #[test]
    fn first_nav_only() {
        let html = r#"
            <header><a href="/outside">Outside</a></header>
            <nav>
                <a href="/economy"> Economy </a>
                <a href="/sports">Sports</a>
            </nav>
            <nav><a href="/footer">Footer</a></nav>
        "#;
        assert_eq!(
            extract_nav_links(html, ORIGIN),
            vec![
                NavLink {
                    name: "Economy".into(),
                    link: format!("{ORIGIN}/economy")
                },
                NavLink {
                    name: "Sports".into(),
                    link: format!("{ORIGIN}/sports")
                },
            ]
        );
    }

    #[test]
    fn skips_anchors_without_name_or_href() {
        let html = r#"
            <nav>
                <a href="">Empty</a>
                <a>No href</a>
                <a href="/icon"><img src="x.png"></a>
                <a href="https://e.com/x"><b>Opinion</b> <i>Desk</i></a>
            </nav>
        "#;
        assert_eq!(
            extract_nav_links(html, ORIGIN),
            vec![NavLink {
                name: "OpinionDesk".into(),
                link: "https://e.com/x".into()
            }]
        );
    }

    #[test]
    fn no_nav_region_yields_nothing() {
        assert!(extract_nav_links("<div><a href='/x'>X</a></div>", ORIGIN).is_empty());
    }
}
