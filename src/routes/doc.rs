use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        products::{ProductCreated, ProductPayload},
        users::{LoginPayload, LoginResponse, RegisterPayload, UserRegistered},
    },
    middleware::session::SESSION_COOKIE_NAME,
    models::{Product, User},
    response::ApiResponse,
    routes::{health, products, users},
};

struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::products_endpoint,
        users::users_endpoint,
    ),
    components(
        schemas(
            Product,
            User,
            ProductPayload,
            ProductCreated,
            RegisterPayload,
            LoginPayload,
            UserRegistered,
            LoginResponse,
            ApiResponse<Product>,
            ApiResponse<Vec<Product>>,
            ApiResponse<User>,
            ApiResponse<Vec<User>>,
        )
    ),
    security(
        ("session_cookie" = [])
    ),
    modifiers(&SessionCookieAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog, `?action=` routed"),
        (name = "Users", description = "Accounts and sessions, `?action=` routed"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
