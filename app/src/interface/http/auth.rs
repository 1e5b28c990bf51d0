use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::warn;

use crate::{
    interface::http::problem::{ApiProblem, ApiResult, request_correlation_id},
    state::AppState,
};

/// Rejects requests that do not carry valid HTTP Basic credentials.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let correlation_id = request_correlation_id(request.headers());

    let Some((username, password)) = basic_credentials(request.headers()) else {
        return Err(ApiProblem::unauthorized(
            "authentication is required",
            correlation_id,
        ));
    };

    // bcrypt verification is CPU bound.
    let credentials = state.credentials.clone();
    let attempted_username = username.clone();
    let verified = tokio::task::spawn_blocking(move || credentials.verify(&username, &password))
        .await
        .map_err(|err| {
            ApiProblem::internal(
                format!("credential check failed: {err}"),
                correlation_id.clone(),
            )
        })?;

    if !verified {
        warn!(username = %attempted_username, "rejected request with invalid credentials");
        return Err(ApiProblem::unauthorized(
            "invalid username or password",
            correlation_id,
        ));
    }

    Ok(next.run(request).await)
}

fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
