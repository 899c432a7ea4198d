use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use extractors::TransactionExtractor;
use spendlens_api::config::ApiConfig;
use spendlens_api::handlers;
use spendlens_api::helpers::redis_cache::RedisCache;
use spendlens_api::helpers::response_cache::{MemoryCache, ResponseCache};
use spendlens_api::integrations::GmailClientFactory;
use spendlens_api::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,

    /// Path to the TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("spendlens-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let (config, config_path) = ApiConfig::load(args.config.as_deref())
        .map_err(|e| startup_error("Failed to load config", e))?;
    tracing::info!("Configuration loaded (file: {})", config_path.display());

    if !config.google_oauth.is_configured() {
        tracing::warn!(
            "Google OAuth client credentials are not configured; relying on caller-supplied access tokens"
        );
    }

    let cache: Arc<dyn ResponseCache> = match config.cache.redis_url() {
        Some(redis_url) => {
            let redis = RedisCache::connect(&redis_url)
                .await
                .map_err(|e| startup_error("Failed to connect to Redis", e))?;
            redis
                .ping()
                .await
                .map_err(|e| startup_error("Redis did not answer PING", e))?;
            tracing::info!("Connected to Redis");
            Arc::new(redis)
        }
        None => {
            tracing::warn!("No Redis address configured, caching responses in process memory");
            Arc::new(MemoryCache::new())
        }
    };

    let extractor = TransactionExtractor::from_config(&config.patterns)
        .map_err(|e| startup_error("Invalid transaction patterns", e))?;
    let providers = GmailClientFactory::new(&config.gmail)
        .map_err(|e| startup_error("Failed to initialize Gmail client", e))?;

    let state = AppState::new(&config, cache, Arc::new(providers), Arc::new(extractor));

    let host = config.server.host.clone();
    let port = config.server.port;
    let frontend_url = config.cors.allowed_origin().map(str::to_string);
    if frontend_url.is_none() {
        tracing::warn!("No frontend URL configured, allowing any CORS origin");
    }

    tracing::info!("Server will listen on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = match &frontend_url {
            Some(origin) => Cors::default().allowed_origin(origin),
            None => Cors::default().allow_any_origin(),
        }
        .supports_credentials()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec!["Content-Type", "Authorization"])
        .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
