use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub db: DbConfig,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let db = DbConfig {
            url: database_url_from_env()?,
            max_connections: parsed_var("DB_MAX_CONNECTIONS").unwrap_or(10),
            acquire_timeout_secs: parsed_var("DB_ACQUIRE_TIMEOUT_SECS").unwrap_or(30),
        };

        let ttl_seconds = match std::env::var("JWT_EXPIRES_IN") {
            Ok(raw) => parse_expires_in(&raw)
                .with_context(|| format!("invalid JWT_EXPIRES_IN: {raw:?}"))?,
            Err(_) => parsed_var::<u64>("JWT_TTL_MINUTES")
                .map(|m| m * 60)
                .unwrap_or(24 * 60 * 60),
        };

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "vehicle-registry".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "vehicle-registry-users".into()),
            ttl_seconds,
        };

        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parsed_var("PORT")
            .or_else(|| parsed_var("APP_PORT"))
            .unwrap_or(5000);

        Ok(Self { db, jwt, host, port })
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.db.acquire_timeout_secs)
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse::<T>().ok())
}

/// `DATABASE_URL` wins; otherwise the URL is assembled from the `DB_*` parts.
fn database_url_from_env() -> anyhow::Result<String> {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return Ok(url);
    }
    let host = std::env::var("DB_HOST").context("DATABASE_URL or DB_HOST must be set")?;
    let port = std::env::var("DB_PORT").unwrap_or_else(|_| "5432".into());
    let user = std::env::var("DB_USER").context("DB_USER must be set")?;
    let password = std::env::var("DB_PASSWORD").unwrap_or_default();
    let name = std::env::var("DB_NAME").context("DB_NAME must be set")?;
    Ok(build_database_url(&host, &port, &user, &password, &name))
}

fn build_database_url(host: &str, port: &str, user: &str, password: &str, name: &str) -> String {
    if password.is_empty() {
        format!("postgres://{user}@{host}:{port}/{name}")
    } else {
        format!("postgres://{user}:{password}@{host}:{port}/{name}")
    }
}

/// Parses token lifetimes such as `3600`, `90s`, `30m`, `24h` or `7d` into seconds.
pub fn parse_expires_in(raw: &str) -> anyhow::Result<u64> {
    let raw = raw.trim();
    anyhow::ensure!(!raw.is_empty(), "empty duration");

    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], c.to_ascii_lowercase()),
        _ => (raw, 's'),
    };
    let value: u64 = digits.trim().parse().context("duration must start with a number")?;
    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        other => anyhow::bail!("unknown duration unit {other:?}"),
    };
    anyhow::ensure!(value > 0, "duration must be positive");
    Ok(value * multiplier)
}
