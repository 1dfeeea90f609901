use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};

use quill_types::api::{Claims, CreatePostRequest, Post, UpdatePostRequest};

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::Body;
use crate::respond;

/// The owning user id always comes from the authenticated claims, never from
/// the request body.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Body(req): Body<CreatePostRequest>,
) -> ApiResult<Json<Post>> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        db.db.insert_post(claims.id, &req.title, &req.body)
    })
    .await
    .map_err(|e| ApiError::Internal(e.into()))??;

    Ok(Json(row.into()))
}

pub async fn list_posts(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_posts())
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    let posts: Vec<Post> = rows.into_iter().map(Into::into).collect();
    respond::negotiated(&headers, "post", &posts)
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let id = positive_id(id)?;

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_post(id))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??
        .ok_or(ApiError::NotFound("post"))?;

    respond::negotiated(&headers, "post", &Post::from(row))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Body(req): Body<UpdatePostRequest>,
) -> ApiResult<Json<Post>> {
    let id = positive_id(id)?;

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.update_post(id, &req.title, &req.body))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??
        .ok_or(ApiError::NotFound("post"))?;

    Ok(Json(row.into()))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let id = positive_id(id)?;

    let db = state.clone();
    let deleted = tokio::task::spawn_blocking(move || db.db.delete_post(id))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    if !deleted {
        return Err(ApiError::NotFound("post"));
    }
    Ok(StatusCode::OK)
}

pub(crate) fn positive_id(id: i64) -> ApiResult<i64> {
    if id <= 0 {
        return Err(ApiError::BadRequest("invalid id parameter".into()));
    }
    Ok(id)
}
