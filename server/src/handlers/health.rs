//! Service information and health endpoints

use axum::Json;
use chrono::Utc;

use crate::models::{ApiInfo, HealthResponse};

pub const SERVICE_NAME: &str = "TURN Credentials API";

pub async fn root() -> Json<ApiInfo> {
    Json(ApiInfo {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Provides time-limited TURN credentials for WebRTC clients".to_string(),
    })
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}
