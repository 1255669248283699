//! TURN Credentials Server - time-limited relay credentials for WebRTC
//!
//! This server handles:
//! - Issuing TURN REST API credentials (expiry-stamped username + HMAC-SHA1 password)
//! - Validating credential requests before anything is signed
//! - Optional API key protection of the credential endpoints
//! - Service info and health endpoints

pub mod config;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod models;
pub mod validation;

use std::sync::Arc;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::credentials::CredentialIssuer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub issuer: Arc<CredentialIssuer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let issuer = CredentialIssuer::new(&config.turn);
        Self {
            config: Arc::new(config),
            issuer: Arc::new(issuer),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/turn-credentials",
            get(handlers::turn::issue_credentials_query).post(handlers::turn::issue_credentials),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
