use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::validation::{as_integer, current_year, is_valid_plate, Checker, MIN_VEHICLE_YEAR};
use crate::vehicles::repo_types::{Vehicle, VehicleInput, VehicleStatus};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 5;

/// Body of `POST /vehicles` and `PUT /vehicles/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct VehicleRequest {
    pub plate_number: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub year: Option<Value>,
    pub status: Option<Value>,
}

impl VehicleRequest {
    pub fn validate(self) -> Result<VehicleInput, AppError> {
        self.validate_for_year(current_year())
    }

    fn validate_for_year(self, max_year: i32) -> Result<VehicleInput, AppError> {
        let mut c = Checker::new();

        let plate_number = c.required_raw(
            "plate_number",
            self.plate_number.as_deref(),
            "Plate number is required",
        );
        if !plate_number.is_empty() && !is_valid_plate(&plate_number) {
            c.push(
                "plate_number",
                "Invalid plate number format. Use format like RAA001A",
            );
        }

        let manufacturer = c.required(
            "manufacturer",
            self.manufacturer.as_deref(),
            "Manufacturer is required",
        );
        let model = c.required("model", self.model.as_deref(), "Model is required");

        let year = match self.year.as_ref().filter(|v| !v.is_null()) {
            None => {
                c.push("year", "Year is required");
                0
            }
            Some(raw) => match as_integer(raw) {
                Some(y) if (MIN_VEHICLE_YEAR as i64..=max_year as i64).contains(&y) => y as i32,
                _ => {
                    c.push("year", "Invalid year");
                    0
                }
            },
        };

        let status = match self.status.as_ref().filter(|v| !v.is_null()) {
            None => None,
            Some(raw) => {
                let parsed = raw.as_str().and_then(VehicleStatus::parse);
                if parsed.is_none() {
                    c.push("status", "Status must be either valid or expired");
                }
                parsed
            }
        };

        c.finish()?;
        Ok(VehicleInput {
            plate_number,
            manufacturer,
            model,
            year,
            status,
        })
    }
}

/// `?page=&limit=`; anything missing, unparsable or below 1 falls back to the default.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> i64 {
        positive_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        positive_or(self.limit.as_deref(), DEFAULT_LIMIT)
    }
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            total / limit + i64::from(total % limit != 0)
        } else {
            0
        };
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug)]
pub struct VehiclePage {
    pub vehicles: Vec<Vehicle>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct VehicleListResponse {
    pub success: bool,
    pub data: Vec<Vehicle>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: Vehicle,
}
