//! Ocean API Server
//!
//! Serves NOAA ERDDAP oceanographic measurements through a MySQL cache.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use measurement_store::{MeasurementStore, MySqlStore};

use ocean_api::config::ApiConfig;
use ocean_api::handlers;
use ocean_api::state::AppState;

/// Ocean API Server
#[derive(Parser, Debug)]
#[command(name = "ocean-api")]
#[command(about = "Cached oceanographic measurement server backed by NOAA ERDDAP")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8084", env = "OCEAN_API_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "OCEAN_API_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Apply the database schema before serving
    #[arg(long)]
    migrate: bool,
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .expect("Failed to create Tokio runtime");

    runtime.block_on(async move {
        run_server(args).await;
    });
}

async fn run_server(args: Args) {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting ocean API server");

    let config = ApiConfig::from_env();

    // Connect the measurement cache
    let store = match MySqlStore::connect(&config.database_url).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to connect to MySQL: {}", e);
            std::process::exit(1);
        }
    };

    if args.migrate {
        if let Err(e) = store.migrate().await {
            tracing::error!("Migration failed: {}", e);
            std::process::exit(1);
        }
        info!("Database schema is up to date");
    }

    let store: Arc<dyn MeasurementStore> = Arc::new(store);

    // Initialize application state
    let state = match AppState::new(&config, store) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    // Build router
    let app = Router::new()
        // Measurements
        .route(
            "/datasets/:dataset_id",
            get(handlers::datasets::dataset_handler),
        )
        .route("/map-points", get(handlers::map_points::map_points_handler))
        // Zone catalog and statistics
        .route("/zones", get(handlers::zones::zones_handler))
        .route("/stats", get(handlers::stats::stats_handler))
        // Health
        .route("/health", get(handlers::health::health_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Parse listen address
    let addr: SocketAddr = args.listen.parse().expect("Invalid listen address");

    info!("Ocean API listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server failed");
}
