use reqwest::{Client, Method, RequestBuilder, Response, header};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::{
    client::error::{ClientError, ClientResult},
    dto::users::{LoginResponse, UserRegistered},
    models::{Product, User},
    response::ApiResponse,
};

/// HTTP adapter for the products and users endpoints.
///
/// The server session is carried in a cookie. The client remembers the one
/// handed out at login so callers can persist it between runs.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    cookie: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cookie: None,
        }
    }

    pub fn with_session_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie;
        self
    }

    pub fn session_cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    fn request(&self, method: Method, resource: &str, action: &str) -> RequestBuilder {
        let url = format!("{}/api/{resource}", self.base_url);
        let builder = self.http.request(method, url).query(&[("action", action)]);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    pub async fn products(&self) -> ClientResult<Vec<Product>> {
        let resp = self
            .request(Method::GET, "products", "get_all")
            .send()
            .await?;
        data(resp).await
    }

    pub async fn product(&self, id: i64) -> ClientResult<Product> {
        let resp = self
            .request(Method::GET, "products", "get")
            .query(&[("id", id)])
            .send()
            .await?;
        data(resp).await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> ClientResult<UserRegistered> {
        let resp = self
            .request(Method::POST, "users", "register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
                "full_name": full_name,
            }))
            .send()
            .await?;
        body(resp).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let resp = self
            .request(Method::POST, "users", "login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        if let Some(cookie) = session_cookie_from(&resp) {
            self.cookie = Some(cookie);
        }
        body(resp).await
    }

    /// Ends the server session. The remembered cookie is dropped even if the
    /// request fails.
    pub async fn logout(&mut self) -> ClientResult<()> {
        let result = self.request(Method::GET, "users", "logout").send().await;
        self.cookie = None;
        let _: Value = body(result?).await?;
        Ok(())
    }

    pub async fn current_user(&self) -> ClientResult<User> {
        let resp = self
            .request(Method::GET, "users", "get_user")
            .send()
            .await?;
        data(resp).await
    }

    pub async fn users(&self) -> ClientResult<Vec<User>> {
        let resp = self
            .request(Method::GET, "users", "get_all")
            .send()
            .await?;
        data(resp).await
    }
}

/// `name=value` of the first `Set-Cookie` header, without its attributes.
fn session_cookie_from(resp: &Response) -> Option<String> {
    let raw = resp.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let pair = raw.split(';').next()?.trim();
    (!pair.is_empty()).then(|| pair.to_string())
}

/// Decode a success body, turning failure envelopes into [`ClientError::Api`].
async fn body<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
    let status = resp.status();
    let value: Value = resp.json().await?;
    let success = value.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !status.is_success() || !success {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Request failed")
            .to_string();
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(serde_json::from_value(value)?)
}

async fn data<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
    let envelope: ApiResponse<T> = body(resp).await?;
    envelope.data.ok_or_else(|| ClientError::Api {
        status: 200,
        message: "Response carried no data".into(),
    })
}
