use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::{
    dto::users::{Credentials, LoginResponse, Registration, UserRegistered},
    error::{AppError, AppResult},
    middleware::{auth::SessionContext, session::SessionUser},
    models::{NewUser, User},
    response::{ApiMessage, ApiResponse},
    state::AppState,
    store::StoreError,
};

const DUPLICATE_USER: &str = "Username or email already exists";

/// Salted argon2 hash in PHC string form.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn register_user(
    state: &AppState,
    registration: Registration,
) -> AppResult<UserRegistered> {
    let Registration {
        username,
        email,
        password,
        full_name,
    } = registration;

    if state
        .users
        .find_conflicting_user(&username, &email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(DUPLICATE_USER.into()));
    }

    let new_user = NewUser {
        username,
        email,
        password_hash: hash_password(&password)?,
        full_name,
        is_admin: false,
    };

    let user_id = match state.users.insert_user(&new_user).await {
        Ok(id) => id,
        Err(StoreError::UniqueViolation(constraint)) => {
            tracing::warn!(%constraint, "registration lost a uniqueness race");
            return Err(AppError::Conflict(DUPLICATE_USER.into()));
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(user_id, username = %new_user.username, "user registered");
    Ok(UserRegistered {
        success: true,
        message: "User registered successfully".into(),
        user_id,
    })
}

/// Unknown usernames and wrong passwords are indistinguishable to the caller.
pub async fn login_user(
    state: &AppState,
    session: &mut SessionContext,
    credentials: Credentials,
) -> AppResult<LoginResponse> {
    let Credentials { username, password } = credentials;
    let user = match state.users.find_credentials(&username).await? {
        Some(u) => u,
        None => return Err(AppError::InvalidCredentials),
    };

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    session
        .login(SessionUser {
            user_id: user.id,
            username: username.clone(),
            is_admin: user.is_admin,
        })
        .await?;

    tracing::info!(user_id = user.id, "user logged in");
    Ok(LoginResponse {
        success: true,
        message: "Login successful".into(),
        user_id: user.id,
        username,
        is_admin: user.is_admin,
    })
}

pub async fn logout_user(session: &mut SessionContext) -> AppResult<ApiMessage> {
    if let Some(user) = session.user() {
        tracing::info!(user_id = user.user_id, "user logged out");
    }
    session.logout().await?;
    Ok(ApiMessage::ok("Logged out successfully"))
}

pub async fn get_user(state: &AppState, id: i64) -> AppResult<ApiResponse<User>> {
    let user = match state.users.find_user(id).await? {
        Some(u) => u,
        None => return Err(AppError::NotFound("User not found".into())),
    };
    Ok(ApiResponse::success(user))
}

pub async fn list_users(state: &AppState) -> AppResult<ApiResponse<Vec<User>>> {
    let users = state.users.list_users().await?;
    Ok(ApiResponse::success(users))
}
