//! Travelog Server
//!
//! Stores dated location entries with optional image/video attachments in a
//! key-value store and serves them over a small JSON API, next to the static
//! front-end.
//!
//! Uses SQLite (embedded) as the durable key-value store.

mod error;
mod handlers;
mod settings;
mod storage;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    routing::{delete, get},
    Router,
};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use travelog_core::{KvStore, RecordStore};

use settings::{Settings, StorageBackend};
use storage::{MemoryStore, SqliteStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordStore>,
    pub max_attachment_bytes: usize,
}

#[derive(Parser)]
#[command(name = "travelog-server")]
#[command(author, version, about = "Travelog - travel record service", long_about = None)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, env = "TRAVELOG_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() {
    // Log panics through tracing as well as stderr
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let cli = Cli::parse();

    info!("Starting Travelog Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server(cli).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server(cli: Cli) -> Result<()> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(bind) = cli.bind {
        settings.bind_address = bind;
    }
    info!(
        "Config loaded: bind={}, storage={:?}, static={}",
        settings.bind_address,
        settings.storage,
        settings.static_dir.display()
    );

    let kv = open_store(&settings).await?;
    let records = RecordStore::new(kv).with_page_size(settings.list_page_size);

    let state = AppState {
        records: Arc::new(records),
        max_attachment_bytes: settings.max_attachment_bytes,
    };

    let app = build_router(state, &settings);

    let addr: SocketAddr = settings
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn open_store(settings: &Settings) -> Result<Arc<dyn KvStore>> {
    match settings.storage {
        StorageBackend::Sqlite => {
            let path = settings.database_path();
            let store = SqliteStore::open(&path)
                .await
                .context("Failed to initialize database")?;
            info!("SQLite store initialized at: {}", path);
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory store, records are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub fn build_router(state: AppState, settings: &Settings) -> Router {
    let assets = ServeDir::new(&settings.static_dir)
        .not_found_service(handlers::not_found.into_service());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::index_redirect))
        .merge(api_routes())
        .fallback_service(assets)
        .layer(DefaultBodyLimit::max(settings.body_limit()))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    use handlers::records;

    Router::new()
        .route(
            "/api/records",
            get(records::list)
                .post(records::create)
                .delete(records::delete_without_id)
                .fallback(records::method_not_allowed),
        )
        .route(
            "/api/records/",
            get(records::list)
                .delete(records::delete_without_id)
                .fallback(records::method_not_allowed),
        )
        .route(
            "/api/records/:id",
            delete(records::delete).fallback(records::method_not_allowed),
        )
}
