use tracing::{info, warn};

use crate::auth::{
    dto::{Credentials, PasswordChange, Profile, PublicUser, Registration, Session},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::UserStore,
    repo_types::ProfileChanges,
};
use crate::error::{AppError, AppResult, StoreError};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const EMAIL_EXISTS: &str = "User with this email already exists";
const EMAIL_IN_USE: &str = "Email is already in use";
const USER_NOT_FOUND: &str = "User not found";

fn issue_session(keys: &JwtKeys, user: PublicUser) -> AppResult<Session> {
    let token = keys.sign(user.id, &user.email)?;
    Ok(Session { token, user })
}

/// Maps a unique violation on the write to a conflict with `msg`.
fn conflict_on_unique(e: StoreError, msg: &str) -> AppError {
    match e {
        StoreError::UniqueViolation { .. } => AppError::Conflict(msg.to_string()),
        other => other.into(),
    }
}

pub async fn register(
    users: &dyn UserStore,
    keys: &JwtKeys,
    input: Registration,
) -> AppResult<Session> {
    if users.find_by_email(&input.email).await?.is_some() {
        warn!(email = %input.email, "email already registered");
        return Err(AppError::Conflict(EMAIL_EXISTS.into()));
    }

    let hash = hash_password(&input.password)?;
    let user = users
        .create(input.into_new_user(hash))
        .await
        .map_err(|e| conflict_on_unique(e, EMAIL_EXISTS))?;

    info!(user_id = user.id, email = %user.email, "user registered");
    issue_session(keys, PublicUser::from(&user))
}

/// Unknown email and wrong password fail identically.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    creds: Credentials,
) -> AppResult<Session> {
    let Some(user) = users.find_by_email(&creds.email).await? else {
        warn!(email = %creds.email, "login unknown email");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(&creds.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    }

    info!(user_id = user.id, "user logged in");
    issue_session(keys, PublicUser::from(&user))
}

pub async fn get_profile(users: &dyn UserStore, user_id: i64) -> AppResult<Profile> {
    users
        .find_by_id(user_id)
        .await?
        .map(Profile::from)
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))
}

pub async fn update_profile(
    users: &dyn UserStore,
    user_id: i64,
    changes: ProfileChanges,
) -> AppResult<Profile> {
    let existing = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;

    if changes.email != existing.email
        && users.email_taken_by_other(&changes.email, user_id).await?
    {
        warn!(user_id, email = %changes.email, "email already in use");
        return Err(AppError::Conflict(EMAIL_IN_USE.into()));
    }

    let updated = users
        .update_profile(user_id, changes)
        .await
        .map_err(|e| conflict_on_unique(e, EMAIL_IN_USE))?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;

    info!(user_id, "profile updated");
    Ok(Profile::from(updated))
}

/// Tokens issued before the change stay valid until they expire.
pub async fn change_password(
    users: &dyn UserStore,
    user_id: i64,
    change: PasswordChange,
) -> AppResult<()> {
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;

    if !verify_password(&change.current_password, &user.password_hash)? {
        warn!(user_id, "change password with wrong current password");
        return Err(AppError::IncorrectPassword);
    }

    let hash = hash_password(&change.new_password)?;
    if !users.update_password(user_id, &hash).await? {
        return Err(AppError::NotFound(USER_NOT_FOUND.into()));
    }

    info!(user_id, "password changed");
    Ok(())
}
