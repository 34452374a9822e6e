//! Gate middleware.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use vestibule_gate::{GateDecision, GateRequest};

use crate::state::AppState;

/// Intercept a request to the protected resource.
///
/// Pass-through runs the inner handler unmodified; a redirect answers `302`
/// with `Location` and, on the param-to-cookie exchange, `Set-Cookie`.
pub async fn gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let gate_request = extract_gate_request(&request);
    match state.gatekeeper.evaluate(&gate_request).await {
        GateDecision::PassThrough => next.run(request).await,
        GateDecision::Redirect {
            location,
            set_cookie,
        } => redirect_response(&location, set_cookie.as_ref().map(|c| c.header_value())),
    }
}

fn extract_gate_request(request: &Request) -> GateRequest {
    let header_str = |name: header::HeaderName| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
    };

    GateRequest {
        host: header_str(header::HOST).unwrap_or_default(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(ToString::to_string),
        cookie_header: header_str(header::COOKIE),
    }
}

fn redirect_response(location: &str, set_cookie: Option<String>) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location);
    if let Some(cookie) = set_cookie {
        builder = builder.header(header::SET_COOKIE, cookie);
    }
    builder
        .body(axum::body::Body::empty())
        .map_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response(), |r| r)
}
