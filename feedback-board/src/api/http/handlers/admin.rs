use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use axum::Json;

use crate::api::http::error::ApiError;
use crate::api::http::headers::{expired_cookie, session_cookie, session_token};
use crate::api::http::state::AppState;
use crate::api::http::types::{LoginRequest, SessionResponse, SuccessResponse};
use crate::core::BoardError;
use crate::storage::StoreStats;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let token = state.board.gate().login(&req.password)?;
    let cookie = session_cookie(token.as_str(), state.secure_cookie);
    Ok(([(header::SET_COOKIE, cookie)], Json(SuccessResponse { success: true })))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    state.board.gate().logout(session_token(&headers).as_deref());
    ([(header::SET_COOKIE, expired_cookie(state.secure_cookie))], Json(SuccessResponse { success: true }))
}

pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> Json<SessionResponse> {
    Json(SessionResponse { admin: state.board.is_admin(session_token(&headers).as_deref()) })
}

pub async fn stats(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<StoreStats>, ApiError> {
    if !state.board.is_admin(session_token(&headers).as_deref()) {
        return Err(BoardError::Unauthorized.into());
    }
    Ok(Json(state.board.comments().stats()?))
}
