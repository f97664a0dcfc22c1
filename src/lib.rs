use actix_web::{route, web, HttpResponse, Responder};
use clap::{Parser, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

pub mod browser;
pub mod cache;
pub mod error;
pub mod headlines;
pub mod models;
pub mod navigation;
pub mod published;
pub mod scrape;

use browser::PageRenderer;
use cache::{Cache, CacheStore};
use headlines::HeadlineCollector;
use navigation::NavigationCollector;
use published::TimeEstimator;
use scrape::Scraper;

pub const DIAGNOSTIC_VALUE: &str = "shamim";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Redis,
    Memory,
}

/// How category and home pages are loaded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RendererKind {
    /// Headless Chrome; scripts run before the markup is read
    Headless,
    /// Plain HTTP fetch of the served markup
    Http,
}

#[derive(Parser, Debug, Clone)]
#[clap(about, version, author)]
pub struct Args {
    #[clap(short, long, default_value = "127.0.0.1")]
    pub ip: String,

    #[clap(short, long, default_value = "3000")]
    pub port: u16,

    #[clap(long, env = "REDIS_URL", default_value = "redis://redis:6379")]
    pub redis_url: String,

    #[clap(long, value_enum, default_value = "redis")]
    pub store: StoreKind,

    #[clap(long, value_enum, default_value = "headless")]
    pub renderer: RendererKind,

    /// Chrome binary for the headless renderer; searched for when omitted
    #[clap(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Origin of the news site; relative links are resolved against it
    #[clap(short, long, default_value = "https://www.prothomalo.com")]
    pub site: String,

    #[clap(long, default_value = "60")]
    pub page_timeout: u64,

    #[clap(long, default_value = "30")]
    pub fetch_timeout: u64,

    #[clap(short, long, default_value = "3600")]
    pub cache_lifetime: u64,
}

pub struct AppState {
    pub config: Args,
    pub cache: Cache,
    pub scraper: Scraper,
}

impl AppState {
    /// Wires the collectors and the cache facade around the given page renderer,
    /// article client and store.
    pub fn new(
        config: Args,
        renderer: Arc<dyn PageRenderer>,
        article_client: reqwest::Client,
        store: Arc<dyn CacheStore>,
    ) -> Self {
        let page_timeout = Duration::from_secs(config.page_timeout);
        let estimator =
            TimeEstimator::new(article_client, Duration::from_secs(config.fetch_timeout));
        let cache = Cache::new(store, config.cache_lifetime);

        let navigation = NavigationCollector::new(renderer.clone(), &config.site, page_timeout);
        let headlines = HeadlineCollector::new(renderer, estimator, &config.site, page_timeout);
        let scraper = Scraper::new(navigation, headlines, cache.clone());

        Self {
            config,
            cache,
            scraper,
        }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(root)
        .service(run_scrape)
        .service(news_paper)
        .service(diagnostic);
}

#[route("/", method = "GET")]
async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Welcome to the Prothom Alo Scraper API" }))
}

#[route("/scrape", method = "GET")]
async fn run_scrape(app_data: web::Data<AppState>) -> impl Responder {
    match app_data.scraper.run().await {
        Ok(results) => HttpResponse::Ok().json(json!({ "data": results })),
        Err(e) => {
            error!(error = %e, "[Scrape Error]");
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Something went wrong while scraping." }))
        }
    }
}

#[route("/news-paper", method = "GET")]
async fn news_paper(app_data: web::Data<AppState>) -> impl Responder {
    match app_data.cache.take().await {
        Ok(Some(payload)) if !payload.is_empty() => {
            HttpResponse::Ok().json(json!({ "data": payload }))
        }
        Ok(_) => HttpResponse::NotFound().json(json!({ "error": "Failed to fetch news paper." })),
        Err(e) => {
            error!(error = %e, "[News Paper Error]");
            HttpResponse::NotFound().json(json!({ "error": "Failed to fetch news paper." }))
        }
    }
}

#[route("/shamim", method = "GET")]
async fn diagnostic(app_data: web::Data<AppState>) -> impl Responder {
    match app_data.cache.put(DIAGNOSTIC_VALUE).await {
        Ok(()) => {
            info!(value = DIAGNOSTIC_VALUE, "diagnostic value cached");
            HttpResponse::Ok().json(json!({
                "message": format!("Test value '{DIAGNOSTIC_VALUE}' has been set in cache.")
            }))
        }
        Err(e) => {
            error!(error = %e, "[Diagnostic Write Error]");
            HttpResponse::InternalServerError().json(json!({
                "error": format!("Failed to set test value in cache: {e}")
            }))
        }
    }
}
