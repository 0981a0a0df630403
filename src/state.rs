use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::{
    jwt::JwtKeys,
    repo::{PgUserStore, UserStore},
};
use crate::config::AppConfig;
use crate::vehicles::repo::{PgVehicleStore, VehicleStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtKeys>,
    pub users: Arc<dyn UserStore>,
    pub vehicles: Arc<dyn VehicleStore>,
}

impl AppState {
    /// Opens the connection pool; both stores share it.
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let db = PgPoolOptions::new()
            .max_connections(config.db.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.db.url)
            .await
            .context("connect to database")?;

        let users = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        let vehicles = Arc::new(PgVehicleStore::new(db.clone())) as Arc<dyn VehicleStore>;
        Ok((Self::from_parts(Arc::new(config), users, vehicles), db))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        vehicles: Arc<dyn VehicleStore>,
    ) -> Self {
        let jwt = Arc::new(JwtKeys::new(&config.jwt));
        Self {
            config,
            jwt,
            users,
            vehicles,
        }
    }
}
