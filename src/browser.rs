use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, ScrapeError};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

pub fn build_user_agent() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers
}

/// Loads a page and hands back its document markup. Every call works on its
/// own page, released before the call returns.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String>;
}

/// Renders pages by fetching them directly, presenting itself as a desktop
/// browser.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: reqwest::Client,
}

impl HttpRenderer {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(build_user_agent())
            .build()?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String> {
        fetch_text(&self.client, url, timeout).await
    }
}

/// Renders pages in headless Chrome so script-built markup is included. Each
/// call launches its own browser, which is shut down when the call returns.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    chrome_path: Option<PathBuf>,
}

impl HeadlessRenderer {
    pub fn new(chrome_path: Option<PathBuf>) -> Self {
        Self { chrome_path }
    }
}

#[async_trait]
impl PageRenderer for HeadlessRenderer {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String> {
        let url = url.to_string();
        let chrome_path = self.chrome_path.clone();
        tokio::task::spawn_blocking(move || render_in_chrome(&url, timeout, chrome_path))
            .await
            .map_err(browser_error)?
    }
}

fn browser_error(err: impl Display) -> ScrapeError {
    ScrapeError::Browser(err.to_string())
}

fn render_in_chrome(url: &str, timeout: Duration, chrome_path: Option<PathBuf>) -> Result<String> {
    let options = LaunchOptions::default_builder()
        .headless(true)
        .path(chrome_path)
        .build()
        .map_err(browser_error)?;
    let browser = Browser::new(options).map_err(browser_error)?;
    let tab = browser.new_tab().map_err(browser_error)?;
    tab.set_default_timeout(timeout);

    let content = tab
        .navigate_to(url)
        .and_then(|tab| tab.wait_until_navigated())
        .and_then(|tab| tab.get_content())
        .map_err(browser_error);
    let _ = tab.close(true);

    let html = content?;
    debug!(%url, bytes = html.len(), "page rendered");
    Ok(html)
}

/// GET `url` with a hard timeout and return the body. Non-success statuses are
/// errors.
pub async fn fetch_text(client: &reqwest::Client, url: &str, timeout: Duration) -> Result<String> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| timeout_or_http(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| timeout_or_http(e, timeout))?;
    debug!(%url, bytes = body.len(), "page loaded");
    Ok(body)
}

fn timeout_or_http(err: reqwest::Error, timeout: Duration) -> ScrapeError {
    if err.is_timeout() {
        ScrapeError::Timeout(timeout.as_secs())
    } else {
        ScrapeError::Http(err)
    }
}
