use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::AppResult,
    state::AppState,
    validation::parse_id,
    vehicles::{
        dto::{ListQuery, VehicleListResponse, VehicleRequest, VehicleResponse},
        services,
    },
};

const INVALID_ID: &str = "Invalid vehicle ID";

pub fn vehicle_routes() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicles/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn list_vehicles(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<ListQuery>,
) -> AppResult<Json<VehicleListResponse>> {
    let page = services::list(state.vehicles.as_ref(), user.id(), q.page(), q.limit()).await?;
    Ok(Json(VehicleListResponse {
        success: true,
        data: page.vehicles,
        pagination: page.pagination,
    }))
}

#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn get_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<VehicleResponse>> {
    let id = parse_id(&id, INVALID_ID)?;
    let vehicle = services::get(state.vehicles.as_ref(), user.id(), id).await?;
    Ok(Json(VehicleResponse {
        success: true,
        message: None,
        data: vehicle,
    }))
}

#[instrument(skip(state, user, body), fields(user_id = user.id()))]
pub async fn create_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<VehicleRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<VehicleResponse>)> {
    let Json(payload) = body?;
    let input = payload.validate()?;
    let vehicle = services::create(state.vehicles.as_ref(), user.id(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(VehicleResponse {
            success: true,
            message: Some("Vehicle created successfully"),
            data: vehicle,
        }),
    ))
}

#[instrument(skip(state, user, body), fields(user_id = user.id()))]
pub async fn update_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<VehicleRequest>, JsonRejection>,
) -> AppResult<Json<VehicleResponse>> {
    let id = parse_id(&id, INVALID_ID)?;
    let Json(payload) = body?;
    let input = payload.validate()?;
    let vehicle = services::update(state.vehicles.as_ref(), user.id(), id, input).await?;
    Ok(Json(VehicleResponse {
        success: true,
        message: Some("Vehicle updated successfully"),
        data: vehicle,
    }))
}

#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, INVALID_ID)?;
    services::delete(state.vehicles.as_ref(), user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
