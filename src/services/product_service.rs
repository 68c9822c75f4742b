use crate::{
    dto::products::{ProductCreated, ProductUpdate},
    error::{AppError, AppResult},
    models::{Product, ProductFields},
    response::{ApiMessage, ApiResponse},
    state::AppState,
};

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<Vec<Product>>> {
    let items = state.products.list_products().await?;
    Ok(ApiResponse::success(items))
}

pub async fn get_product(state: &AppState, id: i64) -> AppResult<ApiResponse<Product>> {
    let product = match state.products.find_product(id).await? {
        Some(p) => p,
        None => return Err(AppError::NotFound("Product not found".into())),
    };
    Ok(ApiResponse::success(product))
}

pub async fn create_product(state: &AppState, fields: ProductFields) -> AppResult<ProductCreated> {
    let product_id = state.products.insert_product(&fields).await?;
    tracing::info!(product_id, "product created");
    Ok(ProductCreated {
        success: true,
        message: "Product created".into(),
        product_id,
    })
}

/// Full replace. Updating an id that does not exist still reports success.
pub async fn update_product(state: &AppState, update: ProductUpdate) -> AppResult<ApiMessage> {
    let rows = state
        .products
        .update_product(update.id, &update.fields)
        .await?;
    tracing::info!(product_id = update.id, rows, "product updated");
    Ok(ApiMessage::ok("Product updated"))
}

/// Idempotent: removing a missing product is not an error.
pub async fn delete_product(state: &AppState, id: i64) -> AppResult<ApiMessage> {
    let rows = state.products.delete_product(id).await?;
    tracing::info!(product_id = id, rows, "product deleted");
    Ok(ApiMessage::ok("Product deleted"))
}
