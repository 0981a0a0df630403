use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::{NewUser, ProfileChanges, User};
use crate::error::AppError;
use crate::validation::{Checker, MIN_PASSWORD_LEN};

/// Request body for user registration.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Registration input that passed boundary checks; the password is still plain.
#[derive(Debug)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash,
        }
    }
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, AppError> {
        let mut c = Checker::new();
        let first_name = c.required(
            "first_name",
            self.first_name.as_deref(),
            "First name is required",
        );
        let last_name = c.required("last_name", self.last_name.as_deref(), "Last name is required");
        let email = c.email(self.email.as_deref());
        let password = c.password(
            "password",
            self.password.as_deref(),
            &format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        );
        c.finish()?;
        Ok(Registration {
            first_name,
            last_name,
            email,
            password,
        })
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, AppError> {
        let mut c = Checker::new();
        let email = c.email(self.email.as_deref());
        let password = c.required_raw("password", self.password.as_deref(), "Password is required");
        c.finish()?;
        Ok(Credentials { email, password })
    }
}

impl UpdateProfileRequest {
    pub fn validate(self) -> Result<ProfileChanges, AppError> {
        let mut c = Checker::new();
        let first_name = c.required(
            "first_name",
            self.first_name.as_deref(),
            "First name is required",
        );
        let last_name = c.required("last_name", self.last_name.as_deref(), "Last name is required");
        let email = c.email(self.email.as_deref());
        c.finish()?;
        Ok(ProfileChanges {
            first_name,
            last_name,
            email,
        })
    }
}

impl ChangePasswordRequest {
    pub fn validate(self) -> Result<PasswordChange, AppError> {
        let mut c = Checker::new();
        let current_password = c.required_raw(
            "current_password",
            self.current_password.as_deref(),
            "Current password is required",
        );
        let new_password = c.password(
            "new_password",
            self.new_password.as_deref(),
            &format!("New password must be at least {MIN_PASSWORD_LEN} characters long"),
        );
        c.finish()?;
        Ok(PasswordChange {
            current_password,
            new_password,
        })
    }
}

/// Public part of the user returned next to a token.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            email: u.email.clone(),
        }
    }
}

/// Profile view: the user without the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for Profile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Token plus the user it was issued for.
#[derive(Debug)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

/// Response returned after signup or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
    pub user: PublicUser,
}

impl AuthResponse {
    pub fn new(message: &'static str, session: Session) -> Self {
        Self {
            success: true,
            message,
            token: session.token,
            user: session.user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: Profile,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}
