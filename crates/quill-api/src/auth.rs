use std::sync::Arc;

use axum::{Json, extract::State};

use quill_db::Database;
use quill_types::api::{LoginRequest, RegisterRequest, TokenResponse, User};

use crate::error::{ApiError, ApiResult};
use crate::extract::Body;
use crate::oauth::OauthConfig;
use crate::{password, token};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub jwt_secret: String,
    pub oauth: OauthConfig,
    pub http: reqwest::Client,
}

pub async fn register(
    State(state): State<AppState>,
    Body(req): Body<RegisterRequest>,
) -> ApiResult<Json<User>> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password are required".into(),
        ));
    }

    // Check-then-act: the lookup and the insert are separate statements, so
    // two concurrent registrations of the same name can both pass the check.
    // The UNIQUE column turns the losing insert into a 500, never a
    // duplicate row.
    let db = state.clone();
    let username = req.username.clone();
    let existing = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    if existing.is_some() {
        return Err(ApiError::Conflict("user already exists"));
    }

    let password_hash = password::hash(&req.password)?;

    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || {
        db.db.create_user(&req.username, &password_hash, &req.email)
    })
    .await
    .map_err(|e| ApiError::Internal(e.into()))??;

    Ok(Json(user.into()))
}

pub async fn login(
    State(state): State<AppState>,
    Body(req): Body<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    // Unknown username and wrong password answer identically so responses
    // cannot be used to enumerate accounts.
    let reject = || ApiError::Unauthorized("invalid username or password");

    let db = state.clone();
    let username = req.username.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??
        .ok_or_else(reject)?;

    // OAuth-created accounts have no password and cannot log in this way.
    if user.password.is_empty() || !password::verify(&user.password, &req.password)? {
        return Err(reject());
    }

    let token = token::issue(&state.jwt_secret, user.id, &user.username)?;

    Ok(Json(TokenResponse { token }))
}
