use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;

/// Failure of the network call itself, before any HTTP status exists
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// A request to the product API. A body is always JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        HttpRequest {
            method: Method::GET,
            url: url.into(),
            body: None,
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        HttpRequest {
            method: Method::DELETE,
            url: url.into(),
            body: None,
        }
    }

    /// Request with a JSON-serialized body
    pub fn json<T: Serialize>(
        method: Method,
        url: impl Into<String>,
        body: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(HttpRequest {
            method,
            url: url.into(),
            body: Some(serde_json::to_string(body)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// The single network capability the product API adapter needs
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// HttpClient backed by reqwest
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured reqwest client, e.g. one with a timeout
    pub fn with_client(client: Client) -> Self {
        ReqwestHttpClient { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method, &request.url);
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_request_serializes_body() {
        let request =
            HttpRequest::json(Method::POST, "http://api/products", &json!({ "id": "1" })).unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "http://api/products");
        assert_eq!(request.body.as_deref(), Some(r#"{"id":"1"}"#));
    }

    #[test]
    fn test_bodyless_requests() {
        assert_eq!(HttpRequest::get("http://api").method, Method::GET);
        assert!(HttpRequest::delete("http://api").body.is_none());
    }

    #[test]
    fn test_response_success() {
        assert!(HttpResponse::new(StatusCode::NO_CONTENT, "").is_success());
        assert!(!HttpResponse::new(StatusCode::NOT_FOUND, "").is_success());
    }
}
