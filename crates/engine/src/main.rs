//! Arena Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_engine::api::{self, ConnectionManager};
use arena_engine::infrastructure::config::{EngineConfig, StoreKind};
use arena_engine::infrastructure::memory::InMemoryStore;
use arena_engine::infrastructure::ports::{BattleRepo, CharacterRepo};
use arena_engine::infrastructure::sqlite::SqliteStore;
use arena_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arena_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Arena Engine");

    let config = EngineConfig::from_env();

    let (battle_repo, character_repo): (Arc<dyn BattleRepo>, Arc<dyn CharacterRepo>) =
        match config.store {
            StoreKind::Sqlite => {
                tracing::info!(path = %config.database_path, "Opening SQLite store");
                let store = Arc::new(SqliteStore::connect(&config.database_path).await?);
                (store.clone() as Arc<dyn BattleRepo>, store as Arc<dyn CharacterRepo>)
            }
            StoreKind::Memory => {
                tracing::warn!("Using in-memory store; state is lost on shutdown");
                let store = Arc::new(InMemoryStore::new());
                (store.clone() as Arc<dyn BattleRepo>, store as Arc<dyn CharacterRepo>)
            }
        };

    let connections = Arc::new(ConnectionManager::new(config.notify_capacity));
    let app = Arc::new(App::new(battle_repo, character_repo, connections));

    let mut router = api::http::routes()
        .route("/ws", get(api::websocket::ws_handler))
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
