use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};

use quill_types::api::{Claims, Comment, CreateCommentRequest, UpdateCommentRequest};

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::Body;
use crate::posts::positive_id;
use crate::respond;

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Body(req): Body<CreateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        db.db
            .insert_comment(req.post_id, claims.id, &req.name, &req.email, &req.body)
    })
    .await
    .map_err(|e| ApiError::Internal(e.into()))??;

    Ok(Json(row.into()))
}

pub async fn list_comments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_comments())
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    let comments: Vec<Comment> = rows.into_iter().map(Into::into).collect();
    respond::negotiated(&headers, "comment", &comments)
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let id = positive_id(id)?;

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_comment(id))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??
        .ok_or(ApiError::NotFound("comment"))?;

    respond::negotiated(&headers, "comment", &Comment::from(row))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Body(req): Body<UpdateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    let id = positive_id(id)?;

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        db.db.update_comment(id, &req.name, &req.email, &req.body)
    })
    .await
    .map_err(|e| ApiError::Internal(e.into()))??
    .ok_or(ApiError::NotFound("comment"))?;

    Ok(Json(row.into()))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let id = positive_id(id)?;

    let db = state.clone();
    let deleted = tokio::task::spawn_blocking(move || db.db.delete_comment(id))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    if !deleted {
        return Err(ApiError::NotFound("comment"));
    }
    Ok(StatusCode::OK)
}
