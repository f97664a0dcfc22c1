#![allow(dead_code)]

use async_trait::async_trait;
use clap::Parser;
use news_scrape_cache::browser::PageRenderer;
use news_scrape_cache::cache::{CacheStore, MemoryStore};
use news_scrape_cache::error::{Result, ScrapeError};
use news_scrape_cache::{AppState, Args};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Nothing listens here, so article fetches fail fast and estimate to "Unknown".
pub const ORIGIN: &str = "http://127.0.0.1:9";

/// Serves canned markup per URL and records the order pages were loaded in.
#[derive(Default)]
pub struct FixtureRenderer {
    pages: Mutex<HashMap<String, String>>,
    loads: Mutex<Vec<String>>,
}

impl FixtureRenderer {
    pub fn set(&self, url: &str, html: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), html.to_string());
    }

    pub fn loads(&self) -> Vec<String> {
        self.loads.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageRenderer for FixtureRenderer {
    async fn render(&self, url: &str, _timeout: Duration) -> Result<String> {
        self.loads.lock().unwrap().push(url.to_string());
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or(ScrapeError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

pub fn test_args() -> Args {
    Args::parse_from([
        "news-scrape-cache",
        "--store",
        "memory",
        "--site",
        ORIGIN,
        "--fetch-timeout",
        "5",
    ])
}

pub fn test_state(renderer: Arc<FixtureRenderer>, store: Arc<MemoryStore>) -> AppState {
    state_with_store(renderer, store)
}

pub fn state_with_store(renderer: Arc<FixtureRenderer>, store: Arc<dyn CacheStore>) -> AppState {
    AppState::new(test_args(), renderer, reqwest::Client::new(), store)
}

/// Store whose reads always fail. Deletes succeed and are counted.
#[derive(Default)]
pub struct UnreadableStore {
    deletes: AtomicUsize,
}

impl UnreadableStore {
    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for UnreadableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(redis::RedisError::from((redis::ErrorKind::IoError, "connection reset")).into())
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(false)
    }
}

pub fn home_page() -> String {
    r#"<html><body>
        <nav>
            <a href="/economy">Economy</a>
            <a href="/sports">Sports</a>
        </nav>
    </body></html>"#
        .to_string()
}
