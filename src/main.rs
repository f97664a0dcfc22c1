use actix_web::{web, App, HttpServer};
use clap::Parser;
use news_scrape_cache::browser::{HeadlessRenderer, HttpRenderer, PageRenderer};
use news_scrape_cache::cache::{CacheStore, MemoryStore, RedisStore};
use news_scrape_cache::{routes, AppState, Args, RendererKind, StoreKind};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Args::parse();
    let address = format!("{}:{}", args.ip, args.port);

    let store: Arc<dyn CacheStore> = match args.store {
        StoreKind::Redis => Arc::new(RedisStore::connect(&args.redis_url).await.map_err(|e| {
            error!(error = %e, redis_url = %args.redis_url, "Failed to connect to Redis");
            std::io::Error::new(std::io::ErrorKind::Other, "Cache initialization failed")
        })?),
        StoreKind::Memory => Arc::new(MemoryStore::new()),
    };

    let http = HttpRenderer::new().map_err(|e| {
        error!(error = %e, "Failed to build HTTP client");
        std::io::Error::new(std::io::ErrorKind::Other, "HTTP client initialization failed")
    })?;
    let article_client = http.client().clone();

    let renderer: Arc<dyn PageRenderer> = match args.renderer {
        RendererKind::Headless => Arc::new(HeadlessRenderer::new(args.chrome_path.clone())),
        RendererKind::Http => Arc::new(http),
    };
    info!(renderer = ?args.renderer, "page renderer selected");

    let app_state = web::Data::new(AppState::new(args, renderer, article_client, store));

    info!("Server running at http://{}", address);
    HttpServer::new(move || App::new().app_data(app_state.clone()).configure(routes))
        .bind(&address)?
        .run()
        .await
}
