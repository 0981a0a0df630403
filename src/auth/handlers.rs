use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, ProfileResponse,
            RegisterRequest, UpdateProfileRequest,
        },
        jwt::AuthUser,
        services,
    },
    error::AppResult,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/profile", get(get_profile).put(update_profile))
        .route("/auth/change-password", put(change_password))
}

#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let Json(payload) = body?;
    let input = payload.validate()?;
    let session = services::register(state.users.as_ref(), &state.jwt, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new("User registered successfully", session)),
    ))
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = body?;
    let creds = payload.validate()?;
    let session = services::login(state.users.as_ref(), &state.jwt, creds).await?;
    Ok(Json(AuthResponse::new("Login successful", session)))
}

#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let profile = services::get_profile(state.users.as_ref(), user.id()).await?;
    Ok(Json(ProfileResponse {
        success: true,
        message: None,
        data: profile,
    }))
}

#[instrument(skip(state, user, body), fields(user_id = user.id()))]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AppResult<Json<ProfileResponse>> {
    let Json(payload) = body?;
    let changes = payload.validate()?;
    let profile = services::update_profile(state.users.as_ref(), user.id(), changes).await?;
    Ok(Json(ProfileResponse {
        success: true,
        message: Some("Profile updated successfully"),
        data: profile,
    }))
}

#[instrument(skip(state, user, body), fields(user_id = user.id()))]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(payload) = body?;
    let change = payload.validate()?;
    services::change_password(state.users.as_ref(), user.id(), change).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Password changed successfully",
    }))
}
