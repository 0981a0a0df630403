use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use time::OffsetDateTime;

use crate::error::{AppError, FieldError};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_VEHICLE_YEAR: i32 = 1900;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref PLATE_RE: Regex = Regex::new(r"^RA[A-Z][0-9]{3}[A-Z]$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Regional plate format, e.g. `RAA001A`.
pub fn is_valid_plate(plate: &str) -> bool {
    PLATE_RE.is_match(plate)
}

pub fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

/// Collects field errors so a request reports every bad field at once.
#[derive(Debug, Default)]
pub struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: &str, msg: &str) {
        self.errors.push(FieldError::body(path, msg));
    }

    /// Returns the trimmed value, recording `msg` when it is missing or blank.
    pub fn required(&mut self, path: &str, value: Option<&str>, msg: &str) -> String {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                self.push(path, msg);
                String::new()
            }
        }
    }

    /// Required, but taken exactly as sent.
    pub fn required_raw(&mut self, path: &str, value: Option<&str>, msg: &str) -> String {
        match value {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                self.push(path, msg);
                String::new()
            }
        }
    }

    pub fn email(&mut self, value: Option<&str>) -> String {
        let email = value.map(|e| e.trim().to_lowercase()).unwrap_or_default();
        if !is_valid_email(&email) {
            self.push("email", "Please provide a valid email");
        }
        email
    }

    pub fn password(&mut self, path: &str, value: Option<&str>, msg: &str) -> String {
        let password = value.unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LEN {
            self.push(path, msg);
        }
        password.to_string()
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// Accepts a whole JSON number (`2015` or `2015.0`) or a numeric string.
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Parses a path segment as a record id.
pub fn parse_id(raw: &str, msg: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(vec![FieldError::params("id", msg)]))
}
