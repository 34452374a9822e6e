//! Queue API routes.

use axum::extract::{Query, State};
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use vestibule_core::Token;
use vestibule_engine::{JoinOutcome, StatusReport};

use crate::error::ApiError;
use crate::gate_layer::gate;
use crate::state::AppState;

/// The full application: public queue API plus the gated origin placeholder.
///
/// `/join` and `/status` are reachable by anyone; the root route stands in
/// for the protected resource and only answers once the gate lets a request
/// through. Deployments fronting a real origin mount [`gate`] on their own
/// router instead.
#[must_use]
pub fn app(state: AppState) -> Router {
    let origin = Router::new()
        .route("/", get(origin_placeholder))
        .route_layer(middleware::from_fn_with_state(state.clone(), gate));

    Router::new()
        .route("/join", post(join))
        .route("/status", get(status))
        .merge(origin)
        .with_state(state)
}

async fn join(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    match state.enqueue.join().await? {
        JoinOutcome::Queued { token } => Ok(Json(json!({ "token": token }))),
        JoinOutcome::DirectAccess => Ok(Json(json!({ "status": "DIRECT_ACCESS" }))),
    }
}

#[derive(Debug, Deserialize)]
struct StatusParams {
    token: Option<String>,
}

async fn status(
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> Result<Json<Value>, ApiError> {
    let raw = params.token.ok_or(ApiError::MissingToken)?;
    let token = Token::parse(&raw).map_err(|_| ApiError::MalformedToken)?;

    let body = match state.status.status(&token).await? {
        StatusReport::Allowed { pass: Some(pass) } => {
            json!({ "status": "ALLOWED", "pass": pass.as_str() })
        }
        StatusReport::Allowed { pass: None } => json!({ "status": "ALLOWED" }),
        StatusReport::Waiting { position } => {
            json!({ "status": "WAITING", "position": position })
        }
        StatusReport::Other { status } => json!({ "status": status }),
    };
    Ok(Json(body))
}

async fn origin_placeholder() -> &'static str {
    "origin reached\n"
}
