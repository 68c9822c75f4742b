//! Client half of the storefront: the locally persisted cart, the mirror of
//! the server session, and an HTTP adapter for the two API endpoints.
//!
//! Nothing here talks to the database. State lives in a [`LocalStorage`]
//! (a string key/value store) and is loaded and saved explicitly by each
//! operation.

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod storage;

pub use api::ApiClient;
pub use auth::{CurrentUser, NavLink};
pub use cart::{Cart, CartRepository, LineItem};
pub use error::{ClientError, ClientResult};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
