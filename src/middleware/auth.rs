use axum::{
    extract::FromRequestParts,
    http::{Method, request::Parts},
};
use tower_sessions::Session;

use crate::{
    error::{AppError, AppResult},
    middleware::session::{SessionUser, keys},
};

/// Session state for one request, loaded before any handler runs.
#[derive(Debug, Clone)]
pub struct SessionContext {
    session: Session,
    user: Option<SessionUser>,
}

impl SessionContext {
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> AppResult<&SessionUser> {
        self.user.as_ref().ok_or(AppError::Unauthenticated)
    }

    /// Start an authenticated session under a fresh id.
    pub async fn login(&mut self, user: SessionUser) -> AppResult<()> {
        self.session.cycle_id().await?;
        self.session.insert(keys::CURRENT_USER, &user).await?;
        self.user = Some(user);
        Ok(())
    }

    /// Drop everything the session holds and expire its cookie.
    pub async fn logout(&mut self) -> AppResult<()> {
        self.session.flush().await?;
        self.user = None;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(anyhow::anyhow!(msg)))?;
        let user = session.get::<SessionUser>(keys::CURRENT_USER).await?;
        Ok(Self { session, user })
    }
}

/// Session requirement of one routed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Public,
    Authenticated,
    Admin,
}

/// What an action demands of the request before its handler may run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access {
    /// `None` accepts any method.
    pub method: Option<Method>,
    pub gate: Gate,
}

impl Access {
    pub fn public(method: Method) -> Self {
        Self {
            method: Some(method),
            gate: Gate::Public,
        }
    }

    pub fn any_method(gate: Gate) -> Self {
        Self { method: None, gate }
    }

    pub fn admin(method: Method) -> Self {
        Self {
            method: Some(method),
            gate: Gate::Admin,
        }
    }
}

/// The single authorization gate. Admin actions reached with the wrong method
/// are refused like any other non-admin request.
pub fn authorize(access: &Access, method: &Method, session: &SessionContext) -> AppResult<()> {
    authorize_user(access, method, session.user())
}

fn authorize_user(access: &Access, method: &Method, user: Option<&SessionUser>) -> AppResult<()> {
    let method_ok = access.method.as_ref().is_none_or(|m| m == method);
    match access.gate {
        Gate::Admin => {
            if !method_ok || !user.is_some_and(|u| u.is_admin) {
                return Err(AppError::Forbidden);
            }
        }
        Gate::Authenticated => {
            if user.is_none() {
                return Err(AppError::Unauthenticated);
            }
            if !method_ok {
                return Err(AppError::MethodNotAllowed);
            }
        }
        Gate::Public => {
            if !method_ok {
                return Err(AppError::MethodNotAllowed);
            }
        }
    }
    Ok(())
}
