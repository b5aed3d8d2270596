use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::config::ProxyConfig;

pub mod handlers;
pub mod types;

use handlers::{chat_completions, list_models};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/models", get(list_models))
}
