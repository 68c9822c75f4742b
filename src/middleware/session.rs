//! Cookie-backed server sessions.
//!
//! The session only ever holds a [`SessionUser`] under [`keys::CURRENT_USER`],
//! so `is_admin` is a boolean at rest and never needs normalizing on read.

use serde::{Deserialize, Serialize};
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::AppConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "storefront_session";

/// Identity stored in the session between login and logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
    pub is_admin: bool,
}

pub mod keys {
    /// Key for the logged-in [`super::SessionUser`].
    pub const CURRENT_USER: &str = "current_user";
}

/// Wrap a session store in the manager layer with the configured cookie policy.
pub fn create_session_layer<S>(store: S, config: &AppConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(config.session_expiry_secs),
        ))
        .with_secure(config.session_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
