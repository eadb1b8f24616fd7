//! HTTP client for the remote ordering API.
//!
//! The API is an external collaborator: dishes, orders and auth live
//! server-side and this module only speaks its REST surface. Workflows
//! depend on the [`OrderingApi`] trait so they can be exercised against a
//! mock.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;

use sagra::catalog::Dish;
use sagra::orders::{Order, OrderStatus};

pub mod records;

use records::{
    DishUpdate, LoginRequest, LoginResponse, NewDish, NewOrderRequest, StatusUpdateRequest,
};

/// Configuration for reaching the ordering API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `"http://localhost:3001"`.
    pub base_url: String,
}

/// Contract surface of the remote ordering API.
#[automock]
#[async_trait]
pub trait OrderingApi: Send + Sync {
    /// GET `/dishes`.
    async fn list_dishes(&self) -> Result<Vec<Dish>, ApiError>;

    /// POST `/dishes` (bearer).
    async fn create_dish(&self, dish: NewDish) -> Result<Dish, ApiError>;

    /// PUT `/dishes/{id}` (bearer); partial bodies are allowed.
    async fn update_dish(&self, id: &str, update: DishUpdate) -> Result<Dish, ApiError>;

    /// DELETE `/dishes/{id}` (bearer).
    async fn delete_dish(&self, id: &str) -> Result<(), ApiError>;

    /// GET `/orders` (bearer).
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// GET `/orders/{id}`; an empty-object body is "not found".
    async fn get_order(&self, id: &str) -> Result<Option<Order>, ApiError>;

    /// POST `/orders`.
    async fn create_order(&self, order: NewOrderRequest) -> Result<Order, ApiError>;

    /// PATCH `/orders/{id}/status` (bearer).
    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<(), ApiError>;

    /// POST `/orders/{id}/print` (bearer).
    async fn print_order(&self, id: &str) -> Result<(), ApiError>;

    /// POST `/auth/login`; returns the bearer token.
    async fn login(&self, username: &str, password: &str) -> Result<String, ApiError>;
}

/// `reqwest`-backed [`OrderingApi`] implementation.
#[derive(Debug, Clone)]
pub struct HttpOrderingApi {
    config: ApiConfig,
    http: Client,
    token: Option<String>,
}

impl HttpOrderingApi {
    /// Creates an unauthenticated client.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
            token: None,
        }
    }

    /// Attaches a bearer token for admin calls.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let base = self.config.base_url.trim_end_matches('/');
        let builder = self.http.request(method, format!("{base}{path}"));

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        Err(ApiError::UnexpectedResponse { status, body })
    }
}

#[async_trait]
impl OrderingApi for HttpOrderingApi {
    async fn list_dishes(&self) -> Result<Vec<Dish>, ApiError> {
        let response = self.request(Method::GET, "/dishes").send().await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_dish(&self, dish: NewDish) -> Result<Dish, ApiError> {
        let response = self
            .request(Method::POST, "/dishes")
            .json(&dish)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_dish(&self, id: &str, update: DishUpdate) -> Result<Dish, ApiError> {
        let response = self
            .request(Method::PUT, &format!("/dishes/{id}"))
            .json(&update)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_dish(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &format!("/dishes/{id}"))
            .send()
            .await?;

        Self::check(response).await?;

        Ok(())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let response = self.request(Method::GET, "/orders").send().await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn get_order(&self, id: &str) -> Result<Option<Order>, ApiError> {
        let response = self
            .request(Method::GET, &format!("/orders/{id}"))
            .send()
            .await?;

        let body: Value = Self::check(response).await?.json().await?;

        decode_order(body)
    }

    async fn create_order(&self, order: NewOrderRequest) -> Result<Order, ApiError> {
        let response = self
            .request(Method::POST, "/orders")
            .json(&order)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<(), ApiError> {
        let response = self
            .request(Method::PATCH, &format!("/orders/{id}/status"))
            .json(&StatusUpdateRequest { status })
            .send()
            .await?;

        Self::check(response).await?;

        Ok(())
    }

    async fn print_order(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, &format!("/orders/{id}/print"))
            .send()
            .await?;

        Self::check(response).await?;

        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let body: LoginResponse = Self::check(response).await?.json().await?;

        Ok(body.access_token)
    }
}

/// Decodes a single-order body, treating `null` and `{}` as "not found".
fn decode_order(body: Value) -> Result<Option<Order>, ApiError> {
    let empty = match &body {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    };

    if empty {
        return Ok(None);
    }

    Ok(Some(serde_json::from_value(body)?))
}

/// Errors from the ordering API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport or body decoding failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-2xx response.
    #[error("unexpected response from the ordering API: {status}: {body}")]
    UnexpectedResponse {
        /// HTTP status of the response.
        status: StatusCode,
        /// Response body, for the notification.
        body: String,
    },

    /// A 2xx response carried a body that does not match the contract.
    #[error("malformed response from the ordering API")]
    Decode(#[from] serde_json::Error),
}
