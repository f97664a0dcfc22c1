//! Relative publish time of an article, read from the `datetime` attribute of
//! the page's first `<time>` element.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::browser::fetch_text;
use crate::error::{Result, ScrapeError};

pub const UNKNOWN: &str = "Unknown";

lazy_static! {
    static ref TIME: Selector = Selector::parse("time").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    /// No offset in the markup; read as local wall-clock time.
    Naive(NaiveDateTime),
}

impl Timestamp {
    pub fn hours_before(&self, now: DateTime<Utc>) -> f64 {
        let elapsed = match self {
            Timestamp::Zoned(dt) => now.with_timezone(dt.offset()) - *dt,
            Timestamp::Naive(dt) => now.with_timezone(&Local).naive_local() - *dt,
        };
        elapsed.num_milliseconds() as f64 / 3_600_000.0
    }
}

pub fn parse_timestamp(raw: &str) -> Result<Timestamp> {
    let raw = raw.trim();
    let normalized = match raw.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(Timestamp::Zoned(dt));
    }
    for fmt in ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Ok(Timestamp::Zoned(dt));
        }
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Ok(Timestamp::Naive(dt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Timestamp::Naive(dt));
        }
    }

    Err(ScrapeError::Timestamp(raw.to_string()))
}

pub fn format_hours_ago(hours: f64) -> String {
    format!("{:.1} hours ago", hours)
}

/// Relative time for an article body, measured against `now`.
pub fn relative_time(body: &str, now: DateTime<Utc>) -> Result<String> {
    let document = Html::parse_document(body);
    let time = document
        .select(&TIME)
        .next()
        .ok_or(ScrapeError::MissingMarkup("time element"))?;
    let raw = time
        .value()
        .attr("datetime")
        .ok_or(ScrapeError::MissingMarkup("datetime attribute"))?;

    let stamp = parse_timestamp(raw)?;
    Ok(format_hours_ago(stamp.hours_before(now)))
}

#[derive(Debug, Clone)]
pub struct TimeEstimator {
    client: reqwest::Client,
    timeout: Duration,
}

impl TimeEstimator {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Never fails: any problem is logged and yields [`UNKNOWN`].
    #[instrument(level = "debug", skip(self))]
    pub async fn estimate(&self, article_url: &str) -> String {
        match self.try_estimate(article_url).await {
            Ok(published) => {
                debug!(%published, "estimated publish time");
                published
            }
            Err(e) => {
                warn!(error = %e, url = %article_url, "[Time Parse Error]");
                UNKNOWN.to_string()
            }
        }
    }

    async fn try_estimate(&self, article_url: &str) -> Result<String> {
        let body = fetch_text(&self.client, article_url, self.timeout).await?;
        relative_time(&body, Utc::now())
    }
}
