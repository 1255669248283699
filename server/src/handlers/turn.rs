//! TURN credentials handlers for WebRTC
//!
//! The JSON body and query string entry points share one validation and
//! issuance path, so both reject the same input with the same error.

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, Result},
    models::{CredentialsQuery, CredentialsRequest, TurnCredentials},
    validation, AppState,
};

use super::ApiKeyGuard;

/// `POST /turn-credentials`
pub async fn issue_credentials(
    State(state): State<AppState>,
    _key: ApiKeyGuard,
    WithRejection(Json(req), _): WithRejection<Json<CredentialsRequest>, AppError>,
) -> Result<Json<TurnCredentials>> {
    issue(&state, &req.username, req.ttl)
}

/// `GET /turn-credentials?username=..&ttl=..`
pub async fn issue_credentials_query(
    State(state): State<AppState>,
    _key: ApiKeyGuard,
    WithRejection(Query(query), _): WithRejection<Query<CredentialsQuery>, AppError>,
) -> Result<Json<TurnCredentials>> {
    issue(&state, &query.username, query.ttl)
}

fn issue(state: &AppState, username: &str, ttl: Option<i64>) -> Result<Json<TurnCredentials>> {
    let req = validation::validate_request(username, ttl, state.config.turn.ttl_bounds())?;
    let credentials = state.issuer.issue(&req.identity, req.ttl)?;
    Ok(Json(credentials))
}
