use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    ActiveValue::NotSet, sea_query::Expr,
};

use crate::{
    db::{DbPool, orm_from_pool},
    entity::{
        Products,
        products::{ActiveModel, Column, Model as ProductModel},
    },
    models::{NewUser, Product, ProductFields, User, UserCredentials},
    store::{ProductStore, StoreError, StoreResult, UserStore},
};

/// PostgreSQL backend. Products go through SeaORM, users through raw sqlx.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
    orm: DatabaseConnection,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        let orm = orm_from_pool(&pool);
        Self { pool, orm }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let items = Products::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(items)
    }

    async fn find_product(&self, id: i64) -> StoreResult<Option<Product>> {
        let product = Products::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(product_from_entity);
        Ok(product)
    }

    async fn insert_product(&self, fields: &ProductFields) -> StoreResult<i64> {
        let active = ActiveModel {
            id: NotSet,
            name: Set(fields.name.clone()),
            description: Set(fields.description.clone()),
            price: Set(fields.price),
            category: Set(fields.category.clone()),
            stock: Set(fields.stock),
            image_url: Set(fields.image_url.clone()),
            created_at: NotSet,
        };
        let product = active.insert(&self.orm).await?;
        Ok(product.id)
    }

    async fn update_product(&self, id: i64, fields: &ProductFields) -> StoreResult<u64> {
        let result = Products::update_many()
            .col_expr(Column::Name, Expr::value(fields.name.clone()))
            .col_expr(Column::Description, Expr::value(fields.description.clone()))
            .col_expr(Column::Price, Expr::value(fields.price))
            .col_expr(Column::Category, Expr::value(fields.category.clone()))
            .col_expr(Column::Stock, Expr::value(fields.stock))
            .col_expr(Column::ImageUrl, Expr::value(fields.image_url.clone()))
            .filter(Column::Id.eq(id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_product(&self, id: i64) -> StoreResult<u64> {
        let result = Products::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_conflicting_user(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<i64>> {
        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = $1 OR email = $2 LIMIT 1")
                .bind(username)
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(existing.map(|(id,)| id))
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<i64> {
        let inserted: Result<(i64,), sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password, full_name, is_admin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.full_name.as_str())
        .bind(user.is_admin)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok((id,)) => Ok(id),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                StoreError::UniqueViolation(db.constraint().unwrap_or("users").to_string()),
            ),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_credentials(&self, username: &str) -> StoreResult<Option<UserCredentials>> {
        let row: Option<(i64, String, bool)> =
            sqlx::query_as("SELECT id, password, is_admin FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, password_hash, is_admin)| UserCredentials {
            id,
            password_hash,
            is_admin,
        }))
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, full_name, is_admin, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, full_name, is_admin, created_at FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        category: model.category,
        stock: model.stock,
        image_url: model.image_url,
    }
}
