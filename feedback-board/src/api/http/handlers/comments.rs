use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::api::http::error::ApiError;
use crate::api::http::headers::{client_ip, session_token};
use crate::api::http::state::AppState;
use crate::api::http::types::{CreateCommentRequest, FeedQuery, PatchCommentRequest, SuccessResponse};
use crate::core::{validate_content, Audience, BoardError, Comment, CommentView};

fn audience(state: &AppState, headers: &HeaderMap) -> Audience {
    Audience::from_admin(state.board.is_admin(session_token(headers).as_deref()))
}

pub async fn list_comments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<FeedQuery>,
) -> Result<Json<Vec<CommentView>>, ApiError> {
    let audience = audience(&state, &headers);
    let feed = state.board.public_feed(q.status.as_deref())?;
    Ok(Json(feed.into_iter().map(|c| CommentView::render(c, audience)).collect()))
}

pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentView>), ApiError> {
    let Json(req) = payload?;
    // reject before spending a profile lookup
    validate_content(&req.content)?;
    let comments = state.board.comments();
    let profile = state.profiles.generate(comments.clock().now_ms()).await;
    let comment = comments.create(&req.content, profile, &client_ip(&headers))?;
    Ok((StatusCode::CREATED, Json(CommentView::render(comment, Audience::Public))))
}

pub async fn get_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<CommentView>, ApiError> {
    let audience = audience(&state, &headers);
    let comment = state.board.comments().get(&id)?;
    Ok(Json(CommentView::render(comment, audience)))
}

pub async fn patch_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<PatchCommentRequest>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let token = session_token(&headers);
    // the session is checked before the body is looked at
    if !state.board.is_admin(token.as_deref()) {
        return Err(BoardError::Unauthorized.into());
    }
    let Json(req) = payload?;
    let comment = state.board.moderator().apply_patch(token.as_deref(), &id, req.status.as_deref(), req.reply)?;
    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.board.moderator().delete_comment(session_token(&headers).as_deref(), &id)?;
    Ok(Json(SuccessResponse { success: true }))
}
