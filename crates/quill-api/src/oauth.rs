use anyhow::anyhow;
use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

use quill_types::api::OauthLoginResponse;

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};
use crate::token;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const EMAIL_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.email";

/// Google OAuth2 configuration, built once at startup and carried in shared
/// state. `state` is the CSRF state string echoed through the consent flow.
/// Endpoint URLs are fields so tests can point them at a local mock.
#[derive(Debug, Clone)]
pub struct OauthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub state: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl OauthConfig {
    pub fn new(client_id: &str, client_secret: &str, redirect_url: &str, state: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_url: redirect_url.to_string(),
            state: state.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }

    pub fn authorize_url(&self) -> String {
        format!(
            "{GOOGLE_AUTH_URL}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_url),
            urlencoding::encode(EMAIL_SCOPE),
            urlencoding::encode(&self.state),
        )
    }
}

#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleProfile {
    email: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: String,
}

/// 303 redirect to the Google consent page.
pub async fn google_auth(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.oauth.authorize_url())
}

/// Exchange the authorization code for an access token, fetch the profile,
/// find-or-create a user by email and answer with a session token. Any
/// network, decode or store failure maps to a 500.
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<Json<OauthLoginResponse>> {
    let exchange: TokenExchangeResponse = state
        .http
        .post(&state.oauth.token_url)
        .form(&[
            ("client_id", state.oauth.client_id.as_str()),
            ("client_secret", state.oauth.client_secret.as_str()),
            ("code", query.code.as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", state.oauth.redirect_url.as_str()),
        ])
        .send()
        .await
        .map_err(|e| ApiError::Internal(anyhow!("token exchange failed: {e}")))?
        .error_for_status()
        .map_err(|e| ApiError::Internal(anyhow!("token exchange failed: {e}")))?
        .json()
        .await
        .map_err(|e| ApiError::Internal(anyhow!("token exchange decode failed: {e}")))?;

    let profile: GoogleProfile = state
        .http
        .get(&state.oauth.userinfo_url)
        .bearer_auth(&exchange.access_token)
        .send()
        .await
        .map_err(|e| ApiError::Internal(anyhow!("userinfo fetch failed: {e}")))?
        .error_for_status()
        .map_err(|e| ApiError::Internal(anyhow!("userinfo fetch failed: {e}")))?
        .json()
        .await
        .map_err(|e| ApiError::Internal(anyhow!("userinfo decode failed: {e}")))?;

    let db = state.clone();
    let email = profile.email.clone();
    let existing = tokio::task::spawn_blocking(move || db.db.get_user_by_email(&email))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    let (user, message) = match existing {
        Some(user) => (user, "Existing user logged in via Google OAuth2.0"),
        None => {
            // First login: create a passwordless account. Username doubles as
            // the email to keep the username uniqueness invariant.
            let db = state.clone();
            let email = profile.email.clone();
            let created =
                tokio::task::spawn_blocking(move || db.db.create_user(&email, "", &email))
                    .await
                    .map_err(|e| ApiError::Internal(e.into()))??;
            (created, "New user registered and logged in via Google OAuth2.0")
        }
    };

    let token = token::issue(&state.jwt_secret, user.id, &user.username)?;

    Ok(Json(OauthLoginResponse {
        token,
        message: message.to_string(),
    }))
}
