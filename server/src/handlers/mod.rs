//! HTTP request handlers for the TURN credentials server

pub mod health;
pub mod turn;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use crate::{error::AppError, AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Passes when no API key is configured or `X-API-Key` matches it.
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyGuard;

#[axum::async_trait]
impl FromRequestParts<AppState> for ApiKeyGuard {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let expected = &state.config.auth.api_key;
        if expected.is_empty() {
            return Ok(ApiKeyGuard);
        }

        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if !keys_match(provided, expected) {
            tracing::warn!(present = !provided.is_empty(), "Invalid API key attempt");
            return Err(AppError::Unauthorized);
        }

        Ok(ApiKeyGuard)
    }
}

/// Constant-time for equal-length inputs.
fn keys_match(provided: &str, expected: &str) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .as_bytes()
        .iter()
        .zip(expected.as_bytes().iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match() {
        assert!(keys_match("abc123", "abc123"));
        assert!(!keys_match("abc124", "abc123"));
        assert!(!keys_match("abc", "abc123"));
        assert!(!keys_match("", "abc123"));
    }
}
