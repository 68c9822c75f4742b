use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::{
    dto::coerce,
    error::{AppError, AppResult},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// One of `register`, `login`, `logout`, `get_user`, `get_all`.
    pub action: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterPayload {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub username: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub password: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub full_name: Option<Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginPayload {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub username: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub password: Option<Value>,
}

/// Validated registration. The password is kept verbatim; it is only ever hashed.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl RegisterPayload {
    pub fn validate(self) -> AppResult<Registration> {
        let registration = Registration {
            username: coerce::sanitize(&coerce::string(self.username.as_ref())),
            email: coerce::sanitize(&coerce::string(self.email.as_ref())),
            password: coerce::string(self.password.as_ref()),
            full_name: coerce::sanitize(&coerce::string(self.full_name.as_ref())),
        };
        if registration.username.is_empty()
            || registration.email.is_empty()
            || registration.password.is_empty()
        {
            return Err(AppError::Validation("All fields are required".into()));
        }
        Ok(registration)
    }
}

impl LoginPayload {
    pub fn validate(self) -> AppResult<Credentials> {
        let credentials = Credentials {
            username: coerce::sanitize(&coerce::string(self.username.as_ref())),
            password: coerce::string(self.password.as_ref()),
        };
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".into(),
            ));
        }
        Ok(credentials)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserRegistered {
    pub success: bool,
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user_id: i64,
    pub username: String,
    pub is_admin: bool,
}
