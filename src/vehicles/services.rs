use tracing::{info, warn};

use crate::error::{AppError, AppResult, StoreError};
use crate::vehicles::{
    dto::{Pagination, VehiclePage},
    repo::VehicleStore,
    repo_types::{Vehicle, VehicleInput},
};

const VEHICLE_NOT_FOUND: &str = "Vehicle not found";
const PLATE_EXISTS: &str = "Vehicle with this plate number already exists";

fn not_found() -> AppError {
    AppError::NotFound(VEHICLE_NOT_FOUND.into())
}

fn plate_conflict(e: StoreError) -> AppError {
    match e {
        StoreError::UniqueViolation { .. } => AppError::Conflict(PLATE_EXISTS.into()),
        other => other.into(),
    }
}

pub async fn list(
    vehicles: &dyn VehicleStore,
    user_id: i64,
    page: i64,
    limit: i64,
) -> AppResult<VehiclePage> {
    let total = vehicles.count_by_user(user_id).await?;
    let pagination = Pagination::new(total, page, limit);
    let rows = vehicles
        .list_by_user(user_id, limit, pagination.offset())
        .await?;
    Ok(VehiclePage {
        vehicles: rows,
        pagination,
    })
}

/// Vehicles of other owners are reported as missing.
pub async fn get(vehicles: &dyn VehicleStore, user_id: i64, id: i64) -> AppResult<Vehicle> {
    vehicles
        .find_owned(id, user_id)
        .await?
        .ok_or_else(not_found)
}

pub async fn create(
    vehicles: &dyn VehicleStore,
    user_id: i64,
    input: VehicleInput,
) -> AppResult<Vehicle> {
    if vehicles.plate_taken(&input.plate_number, None).await? {
        warn!(user_id, plate = %input.plate_number, "duplicate plate number");
        return Err(AppError::Conflict(PLATE_EXISTS.into()));
    }

    let vehicle = vehicles
        .create(user_id, &input)
        .await
        .map_err(plate_conflict)?;

    info!(user_id, vehicle_id = vehicle.id, "vehicle created");
    Ok(vehicle)
}

pub async fn update(
    vehicles: &dyn VehicleStore,
    user_id: i64,
    id: i64,
    input: VehicleInput,
) -> AppResult<Vehicle> {
    let existing = vehicles
        .find_owned(id, user_id)
        .await?
        .ok_or_else(not_found)?;

    if input.plate_number != existing.plate_number
        && vehicles.plate_taken(&input.plate_number, Some(id)).await?
    {
        warn!(user_id, vehicle_id = id, plate = %input.plate_number, "duplicate plate number");
        return Err(AppError::Conflict(PLATE_EXISTS.into()));
    }

    let vehicle = vehicles
        .update(id, user_id, &input)
        .await
        .map_err(plate_conflict)?
        .ok_or_else(not_found)?;

    info!(user_id, vehicle_id = id, "vehicle updated");
    Ok(vehicle)
}

pub async fn delete(vehicles: &dyn VehicleStore, user_id: i64, id: i64) -> AppResult<()> {
    if !vehicles.delete(id, user_id).await? {
        return Err(not_found());
    }
    info!(user_id, vehicle_id = id, "vehicle deleted");
    Ok(())
}
