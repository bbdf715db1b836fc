use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod db;
mod dto;
mod error;
mod extract;
mod handlers;
mod models;
mod services;

use config::Config;
use db::Store;
use services::reminders::{spawn_reminder_worker, LogNotifier, Notifier};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cycletrack_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    let state = AppState {
        store: Store::new(),
        config: config.clone(),
    };

    if config.reminders_enabled {
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
        spawn_reminder_worker(
            state.store.clone(),
            notifier,
            std::time::Duration::from_secs(config.reminder_interval_secs),
        );
        tracing::info!(
            interval_secs = config.reminder_interval_secs,
            "Reminder worker started"
        );
    }

    let app = app(state).layer(cors_layer(&config)?);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/check", get(handlers::auth::check));

    let api_routes = Router::new()
        // Users
        .route("/api/users", post(handlers::users::create_user))
        .route(
            "/api/users/:id",
            get(handlers::users::get_user).patch(handlers::users::update_user),
        )
        .route(
            "/api/users/:id/entries",
            get(handlers::entries::list_user_entries),
        )
        .route(
            "/api/users/:id/insights",
            get(handlers::insights::get_insights),
        )
        // Entries
        .route("/api/entries", post(handlers::entries::create_entry))
        .route(
            "/api/entries/:id",
            get(handlers::entries::get_entry).patch(handlers::entries::update_entry),
        );

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(auth_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origin = config
        .frontend_url
        .parse::<axum::http::HeaderValue>()
        .context("FRONTEND_URL is not a valid origin")?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]))
}
