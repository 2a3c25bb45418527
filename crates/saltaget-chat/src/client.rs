//! Chat and product backend access.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use saltaget_core::config::EndpointsConfig;
use saltaget_core::types::{ChatReply, ChatRequest, ProductsRequest, ProductsResponse};

use crate::error::{ApiError, ChatError};

const CHAT_PATH: &str = "/api/chat/";
const PRODUCTS_BY_IDS_PATH: &str = "/api/products/by-ids/";

/// Remote side of a conversation.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one visitor message and wait for the assistant reply.
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;

    /// Resolve product ids to records. Unknown ids are silently skipped by
    /// the backend, so the result may be shorter than `ids`.
    async fn products_by_ids(&self, ids: &[i64]) -> Result<ProductsResponse, ApiError>;
}

/// [`ChatBackend`] speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatBackend {
    /// Create a backend rooted at `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Client(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a backend from the configured chat endpoint.
    pub fn from_config(endpoints: &EndpointsConfig) -> Result<Self, ChatError> {
        Self::new(
            endpoints.chat_base_url.clone(),
            Duration::from_secs(endpoints.request_timeout_secs),
        )
    }

    /// Reuse an existing client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "POST");
        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Backend request rejected");
            return Err(ApiError::Status(status.as_u16()));
        }
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.post_json(CHAT_PATH, request).await
    }

    async fn products_by_ids(&self, ids: &[i64]) -> Result<ProductsResponse, ApiError> {
        let body = ProductsRequest { ids: ids.to_vec() };
        let resp: ProductsResponse = self.post_json(PRODUCTS_BY_IDS_PATH, &body).await?;
        if resp.products.len() < ids.len() {
            tracing::debug!(
                requested = ids.len(),
                returned = resp.products.len(),
                "Some product ids were not found"
            );
        }
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn backend_for(server: &MockServer) -> HttpChatBackend {
        HttpChatBackend::new(server.base_url(), Duration::from_secs(5)).unwrap()
    }

    fn product_json(id: i64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "final_price": "$ 100",
            "is_available": true,
            "discount_percentage": 0,
            "rating_stars": "4.0"
        })
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpChatBackend::with_client(reqwest::Client::new(), "http://host:8000/");
        assert_eq!(backend.base_url(), "http://host:8000");
        assert_eq!(backend.endpoint(CHAT_PATH), "http://host:8000/api/chat/");
    }

    #[tokio::test]
    async fn test_send_message_posts_payload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/chat/")
                    .json_body(json!({"message": "hola"}));
                then.status(200).json_body(json!({
                    "success": true,
                    "response": "¡Hola!"
                }));
            })
            .await;

        let reply = backend_for(&server)
            .send_message(&ChatRequest {
                message: "hola".into(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(reply.success);
        assert_eq!(reply.response, "¡Hola!");
        assert!(reply.front_end_data.is_none());
    }

    #[tokio::test]
    async fn test_send_message_parses_front_end_data() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/chat/");
                then.status(200).json_body(json!({
                    "success": true,
                    "response": "Sí",
                    "front_end_data": {"model": "Product", "ids": [1, 2]}
                }));
            })
            .await;

        let reply = backend_for(&server)
            .send_message(&ChatRequest {
                message: "¿Tienen notebooks?".into(),
            })
            .await
            .unwrap();
        assert_eq!(reply.product_ids(), Some(&[1, 2][..]));
    }

    #[tokio::test]
    async fn test_send_message_rate_limited() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/chat/");
                then.status(429).body("Too Many Requests");
            })
            .await;

        let err = backend_for(&server)
            .send_message(&ChatRequest {
                message: "hola".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Status(429));
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_send_message_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/chat/");
                then.status(500);
            })
            .await;

        let err = backend_for(&server)
            .send_message(&ChatRequest {
                message: "hola".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Status(500));
        assert!(!err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_send_message_invalid_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/chat/");
                then.status(200).body("<html>oops</html>");
            })
            .await;

        let err = backend_for(&server)
            .send_message(&ChatRequest {
                message: "hola".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let backend =
            HttpChatBackend::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = backend
            .send_message(&ChatRequest {
                message: "hola".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn test_products_by_ids() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/products/by-ids/")
                    .json_body(json!({"ids": [1, 2, 99]}));
                then.status(200).json_body(json!({
                    "products": [product_json(1, "Notebook A"), product_json(2, "Notebook B")],
                    "count": 2
                }));
            })
            .await;

        let resp = backend_for(&server)
            .products_by_ids(&[1, 2, 99])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(resp.count, 2);
        assert_eq!(resp.products.len(), 2);
        assert_eq!(resp.products[1].name, "Notebook B");
    }

    #[tokio::test]
    async fn test_products_by_ids_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/products/by-ids/");
                then.status(502);
            })
            .await;

        let err = backend_for(&server)
            .products_by_ids(&[1])
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Status(502));
    }
}
