/// HTTP transport for the product API
mod backend_product_service;
mod client;
mod json_fetcher;

pub use backend_product_service::BackendProductService;
pub use client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient, TransportError};
pub use json_fetcher::{FetchError, JsonFetcher};
