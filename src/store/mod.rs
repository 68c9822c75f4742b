//! Persistence ports for the two resources.
//!
//! Handlers only see these traits; the concrete backend is picked at startup
//! and carried in [`crate::state::AppState`].

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUser, Product, ProductFields, User, UserCredentials};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("{0}")]
    Orm(#[from] sea_orm::DbErr),

    /// A unique constraint rejected the write.
    #[error("duplicate value violates unique constraint {0}")]
    UniqueViolation(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, newest first.
    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    async fn find_product(&self, id: i64) -> StoreResult<Option<Product>>;

    /// Inserts a product and returns the id the store assigned to it.
    async fn insert_product(&self, fields: &ProductFields) -> StoreResult<i64>;

    /// Overwrites every column of the product. Returns the number of rows touched.
    async fn update_product(&self, id: i64, fields: &ProductFields) -> StoreResult<u64>;

    /// Returns the number of rows removed; zero is not an error.
    async fn delete_product(&self, id: i64) -> StoreResult<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Id of any account already holding `username` or `email`.
    async fn find_conflicting_user(&self, username: &str, email: &str)
    -> StoreResult<Option<i64>>;

    /// Fails with [`StoreError::UniqueViolation`] if a concurrent insert won the race.
    async fn insert_user(&self, user: &NewUser) -> StoreResult<i64>;

    async fn find_credentials(&self, username: &str) -> StoreResult<Option<UserCredentials>>;

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;
}
