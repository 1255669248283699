//! Wire models for the TURN credentials API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Credential Models
// ============================================================================

/// Credentials returned to the client, in the shape WebRTC `iceServers`
/// entries are built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCredentials {
    /// `<expiry unix timestamp>:<identity>`
    pub username: String,
    pub password: String,
    pub ttl: u64,
    pub uris: Vec<String>,
}

/// Body of `POST /turn-credentials`.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    #[serde(default)]
    pub ttl: Option<i64>,
}

/// Query string of `GET /turn-credentials`.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsQuery {
    pub username: String,
    #[serde(default)]
    pub ttl: Option<i64>,
}

// ============================================================================
// Service Models
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    pub service: String,
    pub version: String,
    pub description: String,
}
