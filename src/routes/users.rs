use std::str::FromStr;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
};

use crate::{
    dto::{
        coerce::parse_body,
        users::{LoginPayload, RegisterPayload, UserQuery},
    },
    error::{AppError, AppResult},
    middleware::auth::{Access, Gate, SessionContext, authorize},
    models::User,
    response::ApiResponse,
    services::user_service,
    state::AppState,
};

/// Every operation the users endpoint understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Register,
    Login,
    Logout,
    GetUser,
    GetAll,
}

impl UserAction {
    pub fn access(self) -> Access {
        match self {
            UserAction::Register | UserAction::Login => Access::public(Method::POST),
            UserAction::Logout => Access::any_method(Gate::Public),
            UserAction::GetUser => Access::any_method(Gate::Authenticated),
            UserAction::GetAll => Access::any_method(Gate::Admin),
        }
    }
}

impl FromStr for UserAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(UserAction::Register),
            "login" => Ok(UserAction::Login),
            "logout" => Ok(UserAction::Logout),
            "get_user" => Ok(UserAction::GetUser),
            "get_all" => Ok(UserAction::GetAll),
            _ => Err(AppError::InvalidAction),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", any(users_endpoint))
}

#[utoipa::path(
    method(get, post),
    path = "/api/users",
    params(UserQuery),
    request_body(
        content = RegisterPayload,
        description = "`register` body; `login` takes only `username` and `password`"
    ),
    responses(
        (status = 200, description = "Envelope with `data` for reads; `register` answers with `UserRegistered`, `login` with `LoginResponse` and a session cookie", body = ApiResponse<Vec<User>>),
        (status = 400, description = "Invalid action or missing fields"),
        (status = 401, description = "Not authenticated or invalid credentials"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already exists"),
    ),
    tag = "Users"
)]
pub async fn users_endpoint(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<UserQuery>, QueryRejection>,
    mut session: SessionContext,
    body: Bytes,
) -> AppResult<Response> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    let query = query.map(|Query(q)| q).unwrap_or_default();
    let action: UserAction = query.action.as_deref().unwrap_or_default().parse()?;
    authorize(&action.access(), &method, &session)?;

    let response = match action {
        UserAction::Register => {
            let registration = parse_body::<RegisterPayload>(&body).validate()?;
            Json(user_service::register_user(&state, registration).await?).into_response()
        }
        UserAction::Login => {
            let credentials = parse_body::<LoginPayload>(&body).validate()?;
            Json(user_service::login_user(&state, &mut session, credentials).await?)
                .into_response()
        }
        UserAction::Logout => Json(user_service::logout_user(&mut session).await?).into_response(),
        UserAction::GetUser => {
            let user_id = session.require_user()?.user_id;
            Json(user_service::get_user(&state, user_id).await?).into_response()
        }
        UserAction::GetAll => Json(user_service::list_users(&state).await?).into_response(),
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_action() {
        for (raw, action) in [
            ("register", UserAction::Register),
            ("login", UserAction::Login),
            ("logout", UserAction::Logout),
            ("get_user", UserAction::GetUser),
            ("get_all", UserAction::GetAll),
        ] {
            assert_eq!(raw.parse::<UserAction>().unwrap(), action);
        }
        assert!("delete".parse::<UserAction>().is_err());
    }
}
