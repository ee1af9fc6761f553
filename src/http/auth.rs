//! Static bearer token authentication.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// Reject requests that do not carry `Authorization: Bearer <token>`.
pub async fn bearer_auth_middleware(
    State(token): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(header) = request.headers().get(AUTHORIZATION) else {
        return unauthorized("Authorization header missing");
    };

    let value = header.to_str().unwrap_or_default();
    let (scheme, presented) = value.split_once(' ').unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case("bearer") || presented != &*token {
        tracing::warn!(path = %request.uri().path(), "Rejected request with invalid bearer token");
        return unauthorized("Unauthorized");
    }

    next.run(request).await
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
