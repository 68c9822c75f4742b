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
        products::{ProductPayload, ProductQuery},
    },
    error::{AppError, AppResult},
    middleware::auth::{Access, SessionContext, authorize},
    models::Product,
    response::ApiResponse,
    services::product_service,
    state::AppState,
};

/// Every operation the products endpoint understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    GetAll,
    Get,
    Create,
    Update,
    Delete,
}

impl ProductAction {
    pub fn access(self) -> Access {
        match self {
            ProductAction::GetAll | ProductAction::Get => Access::public(Method::GET),
            ProductAction::Create => Access::admin(Method::POST),
            ProductAction::Update => Access::admin(Method::PUT),
            ProductAction::Delete => Access::admin(Method::DELETE),
        }
    }
}

impl FromStr for ProductAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get_all" => Ok(ProductAction::GetAll),
            "get" => Ok(ProductAction::Get),
            "create" => Ok(ProductAction::Create),
            "update" => Ok(ProductAction::Update),
            "delete" => Ok(ProductAction::Delete),
            _ => Err(AppError::InvalidAction),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", any(products_endpoint))
}

#[utoipa::path(
    method(get, post, put, delete),
    path = "/api/products",
    params(ProductQuery),
    request_body(
        content = ProductPayload,
        description = "`create` and `update` take the product fields, `update` and `delete` the id"
    ),
    responses(
        (status = 200, description = "Envelope with `data` for reads; `create` answers with `ProductCreated`", body = ApiResponse<Vec<Product>>),
        (status = 400, description = "Invalid action or invalid input"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Database error"),
    ),
    tag = "Products"
)]
pub async fn products_endpoint(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<ProductQuery>, QueryRejection>,
    session: SessionContext,
    body: Bytes,
) -> AppResult<Response> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    let query = query.map(|Query(q)| q).unwrap_or_default();
    let action: ProductAction = query.action.as_deref().unwrap_or_default().parse()?;
    authorize(&action.access(), &method, &session)?;

    let response = match action {
        ProductAction::GetAll => Json(product_service::list_products(&state).await?).into_response(),
        ProductAction::Get => {
            let id = query.product_id()?;
            Json(product_service::get_product(&state, id).await?).into_response()
        }
        ProductAction::Create => {
            let fields = parse_body::<ProductPayload>(&body).into_create()?;
            Json(product_service::create_product(&state, fields).await?).into_response()
        }
        ProductAction::Update => {
            let update = parse_body::<ProductPayload>(&body).into_update()?;
            Json(product_service::update_product(&state, update).await?).into_response()
        }
        ProductAction::Delete => {
            let id = parse_body::<ProductPayload>(&body).into_delete()?;
            Json(product_service::delete_product(&state, id).await?).into_response()
        }
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_actions_are_rejected() {
        assert!(matches!("".parse::<ProductAction>(), Err(AppError::InvalidAction)));
        assert!(matches!("GET_ALL".parse::<ProductAction>(), Err(AppError::InvalidAction)));
        assert_eq!("get_all".parse::<ProductAction>().unwrap(), ProductAction::GetAll);
    }

    #[test]
    fn mutations_are_admin_only() {
        for action in [ProductAction::Create, ProductAction::Update, ProductAction::Delete] {
            assert_eq!(action.access().gate, crate::middleware::auth::Gate::Admin);
        }
    }
}
