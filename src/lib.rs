pub mod config;
pub mod db;
pub mod errors;
pub mod http;
mod middleware;
pub mod models;
pub mod state;
pub mod validation;

use axum::{Router, middleware as axum_middleware};
use config::{AppConfig, StoreKind};
use db::{MemoryReviewStore, S3ReviewStore};
use errors::AppError;
use middleware::{cors_layer, create_rate_limiter, rate_limit_middleware};
use state::AppState;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Full application router: routes plus rate limiting, CORS and request tracing.
pub fn create_app(state: AppState, config: &AppConfig) -> Router {
    let rate_limiter = create_rate_limiter(config.rate_limit_per_minute);

    http::create_http_routes(state)
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.allowed_origins))
                .layer(axum_middleware::from_fn(move |req, next| {
                    rate_limit_middleware(rate_limiter.clone(), req, next)
                })),
        )
}

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recommendations_wall=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let state = match config.store {
        StoreKind::S3 => AppState::new(
            S3ReviewStore::from_config(&config.storage).await,
            config.rules.clone(),
        ),
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory review store; reviews are lost on restart");
            AppState::new(MemoryReviewStore::new(), config.rules.clone())
        }
    };

    let app = create_app(state, &config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!("Recommendations wall listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
