//! In-process backend used by `STORE_BACKEND=memory` and by the test suite.
//!
//! Mirrors the PostgreSQL behaviour that handlers rely on: ids are assigned
//! sequentially, products list newest first and `username`/`email` are unique.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    models::{NewUser, Product, ProductFields, User, UserCredentials},
    store::{ProductStore, StoreError, StoreResult, UserStore},
};

#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    products: Vec<Product>,
    next_product_id: i64,
    users: Vec<UserRow>,
    next_user_id: i64,
}

struct UserRow {
    user: User,
    password_hash: String,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn product_row(id: i64, fields: &ProductFields) -> Product {
    Product {
        id,
        name: fields.name.clone(),
        description: fields.description.clone(),
        price: fields.price,
        category: fields.category.clone(),
        stock: fields.stock,
        image_url: fields.image_url.clone(),
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let tables = self.inner.read().await;
        Ok(tables.products.iter().rev().cloned().collect())
    }

    async fn find_product(&self, id: i64) -> StoreResult<Option<Product>> {
        let tables = self.inner.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, fields: &ProductFields) -> StoreResult<i64> {
        let mut tables = self.inner.write().await;
        tables.next_product_id += 1;
        let id = tables.next_product_id;
        tables.products.push(product_row(id, fields));
        Ok(id)
    }

    async fn update_product(&self, id: i64, fields: &ProductFields) -> StoreResult<u64> {
        let mut tables = self.inner.write().await;
        match tables.products.iter_mut().find(|p| p.id == id) {
            Some(existing) => {
                *existing = product_row(id, fields);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_product(&self, id: i64) -> StoreResult<u64> {
        let mut tables = self.inner.write().await;
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        Ok((before - tables.products.len()) as u64)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_conflicting_user(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<i64>> {
        let tables = self.inner.read().await;
        Ok(tables
            .users
            .iter()
            .find(|row| row.user.username == username || row.user.email == email)
            .map(|row| row.user.id))
    }

    async fn insert_user(&self, new_user: &NewUser) -> StoreResult<i64> {
        let mut tables = self.inner.write().await;
        if tables.users.iter().any(|row| row.user.username == new_user.username) {
            return Err(StoreError::UniqueViolation("users_username_key".into()));
        }
        if tables.users.iter().any(|row| row.user.email == new_user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".into()));
        }

        tables.next_user_id += 1;
        let id = tables.next_user_id;
        tables.users.push(UserRow {
            user: User {
                id,
                username: new_user.username.clone(),
                email: new_user.email.clone(),
                full_name: new_user.full_name.clone(),
                is_admin: new_user.is_admin,
                created_at: Utc::now(),
            },
            password_hash: new_user.password_hash.clone(),
        });
        Ok(id)
    }

    async fn find_credentials(&self, username: &str) -> StoreResult<Option<UserCredentials>> {
        let tables = self.inner.read().await;
        Ok(tables
            .users
            .iter()
            .find(|row| row.user.username == username)
            .map(|row| UserCredentials {
                id: row.user.id,
                password_hash: row.password_hash.clone(),
                is_admin: row.user.is_admin,
            }))
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let tables = self.inner.read().await;
        Ok(tables
            .users
            .iter()
            .find(|row| row.user.id == id)
            .map(|row| row.user.clone()))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let tables = self.inner.read().await;
        Ok(tables.users.iter().map(|row| row.user.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn fields(name: &str) -> ProductFields {
        ProductFields {
            name: name.into(),
            description: String::new(),
            price: Decimal::new(1999, 2),
            category: "games".into(),
            stock: 3,
            image_url: String::new(),
        }
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: "hash".into(),
            full_name: String::new(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn products_list_newest_first() {
        let store = InMemoryStore::new();
        let first = store.insert_product(&fields("first")).await.unwrap();
        let second = store.insert_product(&fields("second")).await.unwrap();

        let ids: Vec<i64> = store
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn update_of_missing_product_touches_nothing() {
        let store = InMemoryStore::new();
        assert_eq!(store.update_product(42, &fields("x")).await.unwrap(), 0);
        assert!(store.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_user_enforces_unique_username_and_email() {
        let store = InMemoryStore::new();
        store.insert_user(&new_user("ana", "ana@example.com")).await.unwrap();

        let same_name = store.insert_user(&new_user("ana", "other@example.com")).await;
        assert!(matches!(same_name, Err(StoreError::UniqueViolation(_))));

        let same_email = store.insert_user(&new_user("bob", "ana@example.com")).await;
        assert!(matches!(same_email, Err(StoreError::UniqueViolation(_))));

        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }
}
