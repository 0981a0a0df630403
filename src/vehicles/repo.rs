use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::vehicles::repo_types::{Vehicle, VehicleInput};

const VEHICLE_COLUMNS: &str =
    "id, plate_number, manufacturer, model, year, status, user_id, created_at, updated_at";

/// Vehicle persistence. Every read and write except the plate lookup is
/// scoped by the owning user.
#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Vehicle>, StoreError>;

    async fn count_by_user(&self, user_id: i64) -> Result<i64, StoreError>;

    async fn find_owned(&self, id: i64, user_id: i64) -> Result<Option<Vehicle>, StoreError>;

    /// True when another vehicle (any owner) already carries `plate`.
    async fn plate_taken(&self, plate: &str, except_id: Option<i64>) -> Result<bool, StoreError>;

    async fn create(&self, user_id: i64, input: &VehicleInput) -> Result<Vehicle, StoreError>;

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        input: &VehicleInput,
    ) -> Result<Option<Vehicle>, StoreError>;

    /// Returns `false` when nothing owned by `user_id` matched.
    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgVehicleStore {
    db: PgPool,
}

impl PgVehicleStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VehicleStore for PgVehicleStore {
    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Vehicle>, StoreError> {
        let rows = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            SELECT {VEHICLE_COLUMNS}
              FROM vehicles
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64, StoreError> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vehicles WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;
        Ok(total)
    }

    async fn find_owned(&self, id: i64, user_id: i64) -> Result<Option<Vehicle>, StoreError> {
        let row = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn plate_taken(&self, plate: &str, except_id: Option<i64>) -> Result<bool, StoreError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM vehicles
                 WHERE plate_number = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(plate)
        .bind(except_id)
        .fetch_one(&self.db)
        .await?;
        Ok(taken)
    }

    async fn create(&self, user_id: i64, input: &VehicleInput) -> Result<Vehicle, StoreError> {
        let row = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            INSERT INTO vehicles (plate_number, manufacturer, model, year, status, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(&input.plate_number)
        .bind(&input.manufacturer)
        .bind(&input.model)
        .bind(input.year)
        .bind(input.status.unwrap_or_default())
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        input: &VehicleInput,
    ) -> Result<Option<Vehicle>, StoreError> {
        let row = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            UPDATE vehicles
               SET plate_number = $1,
                   manufacturer = $2,
                   model = $3,
                   year = $4,
                   status = COALESCE($5, status),
                   updated_at = now()
             WHERE id = $6 AND user_id = $7
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(&input.plate_number)
        .bind(&input.manufacturer)
        .bind(&input.model)
        .bind(input.year)
        .bind(input.status)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
