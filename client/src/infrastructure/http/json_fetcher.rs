//! Generic request helper for the product API.
//!
//! Traces each request and response status at `debug` level only. Nothing is logged at
//! higher levels: every failure is returned to the caller as a `FetchError`.
use super::client::{HttpClient, HttpRequest, HttpResponse, TransportError};
use crate::application::dto::{DtoError, DtoResult};
use crate::application::services::{ErrorResponse, ServiceError};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Network(#[source] TransportError),

    #[error("Unsuccessful response: {0}")]
    Status(ErrorResponse),

    #[error("Response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Parse(#[from] DtoError),
}

impl FetchError {
    /// HTTP status of an unsuccessful response
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(response) => Some(response.status),
            _ => None,
        }
    }
}

impl From<FetchError> for ServiceError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Network(source) => ServiceError::Transport(source),
            FetchError::Status(response) => ServiceError::UnexpectedStatus(response),
            FetchError::Json(err) => ServiceError::InvalidResponse(DtoError::Schema(format!(
                "response body is not JSON: {}",
                err
            ))),
            FetchError::Parse(err) => ServiceError::InvalidResponse(err),
        }
    }
}

/// Sends requests and turns JSON responses into typed values.
///
/// A failed network call becomes `Network`, a non-success status becomes `Status`
/// carrying the raw response, and parser failures are passed through unchanged.
#[derive(Debug)]
pub struct JsonFetcher<'a, C: HttpClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: HttpClient + ?Sized> JsonFetcher<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Send a request whose response body is not needed
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        debug!("{} {}", request.method, request.url);

        let response = self
            .client
            .send(request)
            .await
            .map_err(FetchError::Network)?;

        debug!("Received {}", response.status);

        if !response.is_success() {
            return Err(FetchError::Status(ErrorResponse {
                status: response.status.as_u16(),
                body: response.body,
            }));
        }

        Ok(response)
    }

    /// Send a request and hand its JSON body to `parser`
    pub async fn fetch<T, P>(&self, request: HttpRequest, parser: P) -> Result<T, FetchError>
    where
        P: FnOnce(Value) -> DtoResult<T>,
    {
        let response = self.send(request).await?;
        let data: Value = serde_json::from_str(&response.body)?;
        Ok(parser(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::json;

    struct FixedClient(Result<HttpResponse, String>);

    #[async_trait]
    impl HttpClient for FixedClient {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.0.clone().map_err(TransportError::from)
        }
    }

    fn ok_parser(value: Value) -> DtoResult<Value> {
        Ok(value)
    }

    #[tokio::test]
    async fn test_fetch_parses_json() {
        let client = FixedClient(Ok(HttpResponse::new(StatusCode::OK, r#"{"a":1}"#)));

        let value = JsonFetcher::new(&client)
            .fetch(HttpRequest::get("http://api"), ok_parser)
            .await
            .unwrap();

        assert_eq!(value, json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn test_fetch_rejects_unsuccessful_status_with_response() {
        let client = FixedClient(Ok(HttpResponse::new(StatusCode::CONFLICT, "taken")));

        let err = JsonFetcher::new(&client)
            .fetch(HttpRequest::get("http://api"), ok_parser)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(409));
        match err {
            FetchError::Status(response) => assert_eq!(response.body, "taken"),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_reports_network_failure() {
        let client = FixedClient(Err("connection refused".to_string()));

        let err = JsonFetcher::new(&client)
            .fetch(HttpRequest::get("http://api"), ok_parser)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Network(_)));
        assert!(matches!(ServiceError::from(err), ServiceError::Transport(_)));
    }

    #[tokio::test]
    async fn test_fetch_reports_invalid_json() {
        let client = FixedClient(Ok(HttpResponse::new(StatusCode::OK, "<html>")));

        let err = JsonFetcher::new(&client)
            .fetch(HttpRequest::get("http://api"), ok_parser)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Json(_)));
        assert!(matches!(
            ServiceError::from(err),
            ServiceError::InvalidResponse(DtoError::Schema(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_passes_parser_errors_through() {
        let client = FixedClient(Ok(HttpResponse::new(StatusCode::OK, "[]")));

        let err = JsonFetcher::new(&client)
            .fetch(HttpRequest::get("http://api"), |_| -> DtoResult<()> {
                Err(DtoError::Schema("expected object".to_string()))
            })
            .await
            .unwrap_err();

        match err {
            FetchError::Parse(DtoError::Schema(msg)) => assert_eq!(msg, "expected object"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_ignores_empty_body() {
        let client = FixedClient(Ok(HttpResponse::new(StatusCode::NO_CONTENT, "")));

        let response = JsonFetcher::new(&client)
            .send(HttpRequest::delete("http://api"))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::NO_CONTENT);
    }

    struct RecordLevels(std::sync::Arc<std::sync::Mutex<Vec<tracing::Level>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for RecordLevels {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    #[tokio::test]
    async fn test_failures_are_traced_at_debug_only() {
        use tracing_subscriber::layer::SubscriberExt;

        let levels = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(RecordLevels(levels.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let failing = FixedClient(Ok(HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "")));
        let unreachable = FixedClient(Err("connection refused".to_string()));
        assert!(JsonFetcher::new(&failing)
            .send(HttpRequest::get("http://api"))
            .await
            .is_err());
        assert!(JsonFetcher::new(&unreachable)
            .send(HttpRequest::get("http://api"))
            .await
            .is_err());

        let levels = levels.lock().unwrap();
        assert!(!levels.is_empty());
        assert!(levels.iter().all(|level| *level == tracing::Level::DEBUG));
    }
}
