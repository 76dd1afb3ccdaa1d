use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use brainwave::config::{LoggingSettings, Settings};
use brainwave::core::Ranker;
use brainwave::models::ScoringWeights;
use brainwave::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use brainwave::services::{LlmClient, RecommendationCache, RequestStore, SpotCatalog, UserStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging; RUST_LOG takes precedence over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn startup_error(what: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("Failed to {}: {}", what, e);
    std::io::Error::other(format!("{}: {}", what, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(&LoggingSettings::default());
            return Err(startup_error("load configuration", e));
        }
    };

    init_tracing(&settings.logging);
    info!("Starting BrainWave matching service...");

    let users = Arc::new(
        UserStore::open(&settings.storage.users_dir)
            .await
            .map_err(|e| startup_error("open user store", e))?,
    );

    let requests = Arc::new(
        RequestStore::open(&settings.storage.requests_dir)
            .await
            .map_err(|e| startup_error("open request store", e))?,
    );

    let spots = Arc::new(
        SpotCatalog::load(&settings.storage.spots_file)
            .await
            .map_err(|e| startup_error("load study spots", e))?,
    );

    if settings.llm.api_key.is_empty() {
        tracing::warn!("No LLM API key configured; recommendations will likely fail");
    }
    let llm = Arc::new(
        LlmClient::new(&settings.llm).map_err(|e| startup_error("create LLM client", e))?,
    );
    info!("LLM client initialized (model: {})", settings.llm.model);

    let cache = Arc::new(RecommendationCache::new(
        settings.cache.max_entries,
        settings.cache.ttl_secs,
    ));
    info!(
        "Recommendation cache initialized ({} entries, TTL: {}s)",
        settings.cache.max_entries, settings.cache.ttl_secs
    );

    let weights = ScoringWeights::from(&settings.scoring.weights);
    let ranker = Ranker::new(weights);
    info!("Ranker initialized with weights: {:?}", weights);

    let app_state = AppState {
        users,
        requests,
        spots,
        llm,
        cache,
        ranker,
        matching: settings.matching.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
