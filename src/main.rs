use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod command;
mod config;
mod conversation;
mod model;

use api::AppState;
use config::ProxyConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // -----------------------------
    // Configuration
    // -----------------------------
    let config = ProxyConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    println!("🚀 Starting CLI proxy on http://{addr}");
    println!("🛠 Target command template: {}", config.template.raw());

    let state = AppState {
        config: Arc::new(config),
    };

    // -----------------------------
    // Router
    // -----------------------------
    let app = Router::new()
        .merge(api::router())
        // CORS for browser-based OpenAI clients
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
