//! Local mirror of the server session and the navigation it implies.
//!
//! The mirror is written once at login and removed at logout. `is_admin` is
//! stored as the string `"true"` or `"false"` and read back as a boolean;
//! any other stored value counts as `false`.

use crate::{
    client::{error::ClientResult, storage::LocalStorage},
    dto::users::LoginResponse,
};

pub const USER_ID_KEY: &str = "user_id";
pub const USERNAME_KEY: &str = "username";
pub const IS_ADMIN_KEY: &str = "is_admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

pub fn record_login<S: LocalStorage + ?Sized>(
    storage: &mut S,
    login: &LoginResponse,
) -> ClientResult<()> {
    storage.set_item(USER_ID_KEY, login.user_id.to_string())?;
    storage.set_item(USERNAME_KEY, login.username.clone())?;
    storage.set_item(
        IS_ADMIN_KEY,
        if login.is_admin { "true" } else { "false" }.to_string(),
    )?;
    Ok(())
}

pub fn clear<S: LocalStorage + ?Sized>(storage: &mut S) -> ClientResult<()> {
    storage.remove_item(USER_ID_KEY)?;
    storage.remove_item(USERNAME_KEY)?;
    storage.remove_item(IS_ADMIN_KEY)?;
    Ok(())
}

pub fn is_logged_in<S: LocalStorage + ?Sized>(storage: &S) -> bool {
    storage.get_item(USER_ID_KEY).is_some()
}

pub fn current_user<S: LocalStorage + ?Sized>(storage: &S) -> Option<CurrentUser> {
    let id = storage.get_item(USER_ID_KEY)?.trim().parse().ok()?;
    Some(CurrentUser {
        id,
        username: storage.get_item(USERNAME_KEY).unwrap_or_default(),
        is_admin: storage.get_item(IS_ADMIN_KEY).as_deref() == Some("true"),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    LogIn,
    Register,
    Admin,
    Profile,
    Logout,
}

impl NavLink {
    pub fn label(self) -> &'static str {
        match self {
            NavLink::LogIn => "Log In",
            NavLink::Register => "Register",
            NavLink::Admin => "Admin",
            NavLink::Profile => "Profile",
            NavLink::Logout => "Logout",
        }
    }
}

/// Account links for the navigation bar. The admin link comes before the
/// profile link and only appears for admins.
pub fn nav_links(user: Option<&CurrentUser>) -> Vec<NavLink> {
    match user {
        None => vec![NavLink::LogIn, NavLink::Register],
        Some(u) if u.is_admin => vec![NavLink::Admin, NavLink::Profile, NavLink::Logout],
        Some(_) => vec![NavLink::Profile, NavLink::Logout],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::MemoryStorage;

    fn login(is_admin: bool) -> LoginResponse {
        LoginResponse {
            success: true,
            message: "Login successful".into(),
            user_id: 4,
            username: "ana".into(),
            is_admin,
        }
    }

    #[test]
    fn login_is_mirrored_with_string_admin_flag() {
        let mut storage = MemoryStorage::new();
        record_login(&mut storage, &login(true)).unwrap();

        assert_eq!(storage.get_item(IS_ADMIN_KEY).as_deref(), Some("true"));
        assert_eq!(
            current_user(&storage),
            Some(CurrentUser {
                id: 4,
                username: "ana".into(),
                is_admin: true,
            })
        );
    }

    #[test]
    fn unexpected_admin_value_reads_as_false() {
        let mut storage = MemoryStorage::new();
        record_login(&mut storage, &login(false)).unwrap();
        storage.set_item(IS_ADMIN_KEY, "1".into()).unwrap();
        assert!(!current_user(&storage).unwrap().is_admin);
    }

    #[test]
    fn clear_logs_out() {
        let mut storage = MemoryStorage::new();
        record_login(&mut storage, &login(false)).unwrap();
        clear(&mut storage).unwrap();

        assert!(!is_logged_in(&storage));
        assert_eq!(current_user(&storage), None);
        assert_eq!(storage.get_item(USERNAME_KEY), None);
    }

    #[test]
    fn nav_depends_on_login_and_admin_flag() {
        assert_eq!(nav_links(None), vec![NavLink::LogIn, NavLink::Register]);

        let mut user = CurrentUser {
            id: 1,
            username: "ana".into(),
            is_admin: false,
        };
        assert_eq!(nav_links(Some(&user)), vec![NavLink::Profile, NavLink::Logout]);

        user.is_admin = true;
        assert_eq!(
            nav_links(Some(&user)),
            vec![NavLink::Admin, NavLink::Profile, NavLink::Logout]
        );
    }
}
