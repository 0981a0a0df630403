use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Registration status of a vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "vehicle_status", rename_all = "lowercase")]
pub enum VehicleStatus {
    #[default]
    Valid,
    Expired,
}

impl VehicleStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "valid" => Some(Self::Valid),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub plate_number: String,
    pub manufacturer: String,
    pub model: String,
    pub year: i32,
    pub status: VehicleStatus,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Field values written on create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleInput {
    pub plate_number: String,
    pub manufacturer: String,
    pub model: String,
    pub year: i32,
    /// `None` keeps the stored status on update and means `valid` on create.
    pub status: Option<VehicleStatus>,
}
