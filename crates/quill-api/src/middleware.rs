use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};

use crate::auth::AppState;
use crate::token;

/// Extract and validate the session JWT from the Authorization header. The
/// header may carry the bare token or a `Bearer ` prefix. On success the
/// claims are injected into request extensions for the downstream handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or((StatusCode::UNAUTHORIZED, "missing authorization token"))?;

    let raw = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);

    let claims = token::verify(&state.jwt_secret, raw)
        .map_err(|_| (StatusCode::UNAUTHORIZED, "invalid token"))?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
