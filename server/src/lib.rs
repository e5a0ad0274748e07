//! Blobby Task Store
//!
//! Layered architecture:
//! - domain: tasks, boards, users and their errors
//! - repository: SQLite data access
//! - routes: REST handlers mounted under `/api`

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod routes;

use config::Config;
use domain::DomainResult;
use error::{ApiError, ApiResult};
use repository::Store;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    store: Option<Store>,
}

impl AppState {
    /// Open the configured database, or run without one
    pub fn new(config: Config) -> DomainResult<Self> {
        let store = match &config.database_path {
            Some(path) => {
                info!("Opening database at {}", path.display());
                Some(Store::open(path)?)
            }
            None => {
                warn!("No database configured, every endpoint returns empty results");
                None
            }
        };
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Option<Store>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn store(&self) -> ApiResult<&Store> {
        self.store
            .as_ref()
            .ok_or_else(|| ApiError::Internal("Database not configured".to_string()))
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/boards", get(routes::list_boards).post(routes::create_board))
        .route(
            "/tasks",
            get(routes::list_tasks)
                .post(routes::create_task)
                .put(routes::update_task)
                .delete(routes::delete_task),
        )
        .route("/user", get(routes::get_user).post(routes::upsert_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), deployment_guard));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let mut app = Router::new().nest("/api", api);
    if let Some(dir) = &state.config.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }
    app.layer(cors).with_state(state)
}

/// Without a database, answer before identity is even checked
async fn deployment_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.store.is_some() {
        return next.run(request).await;
    }
    match empty_payload(request.method(), request.uri().path()) {
        Some(body) => Json(body).into_response(),
        None => next.run(request).await,
    }
}

fn empty_payload(method: &Method, path: &str) -> Option<Value> {
    let resource = path.trim_end_matches('/').rsplit('/').next()?;
    let body = match (method, resource) {
        (&Method::GET, "boards") => json!({ "boards": [] }),
        (&Method::POST, "boards") => json!({ "board": null }),
        (&Method::GET, "tasks") => json!({ "tasks": [] }),
        (&Method::POST, "tasks") | (&Method::PUT, "tasks") => json!({ "task": null }),
        (&Method::DELETE, "tasks") => json!({ "success": true }),
        (_, "user") => json!({ "user": null }),
        _ => return None,
    };
    Some(body)
}

pub async fn start_server() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading configuration...");
    let state = AppState::new(Config::load())?;

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
