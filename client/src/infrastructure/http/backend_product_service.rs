use super::client::{HttpClient, HttpRequest, ReqwestHttpClient};
use super::json_fetcher::{FetchError, JsonFetcher};
use crate::application::dto::{
    parse_product, parse_products, parse_stash_item, ProductDto, StashItemDto,
};
use crate::application::services::{ProductService, ServiceError, ServiceResult};
use crate::config::ClientConfig;
use crate::domain::{Entity, PlainDate, Product, ProductId, StashItem, StashItemId};
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

/// ProductService talking to the product API over HTTP.
///
/// Every operation is a single request to a URL built from the base URL and the
/// identifiers involved. Status codes are translated per operation: a 404 on a lookup is
/// `Ok(None)`, a 404 on a mutation is a not-found error, a 409 is a conflict.
#[derive(Debug, Clone)]
pub struct BackendProductService<C: HttpClient = ReqwestHttpClient> {
    client: C,
    base_url: String,
}

impl BackendProductService<ReqwestHttpClient> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(ReqwestHttpClient::new(), config.base_url.as_str())
    }
}

impl<C: HttpClient> BackendProductService<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn fetcher(&self) -> JsonFetcher<'_, C> {
        JsonFetcher::new(&self.client)
    }

    /// `{base}/products/{segments...}` with each segment percent-encoded
    fn url(&self, segments: &[&str]) -> String {
        let mut url = format!("{}/products", self.base_url);
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    fn json_request<T: Serialize>(
        method: Method,
        url: String,
        body: &T,
    ) -> ServiceResult<HttpRequest> {
        HttpRequest::json(method, url, body).map_err(|err| ServiceError::Transport(Box::new(err)))
    }
}

fn status_of(result: &Result<impl Sized, FetchError>) -> Option<u16> {
    result.as_ref().err().and_then(FetchError::status)
}

fn body_of(err: FetchError) -> String {
    match err {
        FetchError::Status(response) => response.body,
        other => other.to_string(),
    }
}

#[async_trait]
impl<C: HttpClient> ProductService for BackendProductService<C> {
    async fn get_all_products_with_stash_items(&self) -> ServiceResult<Vec<Product>> {
        Ok(self
            .fetcher()
            .fetch(HttpRequest::get(self.url(&["with_stash_items"])), parse_products)
            .await?)
    }

    async fn get_product(&self, product_id: &ProductId) -> ServiceResult<Option<Product>> {
        let result = self
            .fetcher()
            .fetch(HttpRequest::get(self.url(&[product_id.as_str()])), parse_product)
            .await;

        match status_of(&result) {
            Some(404) => Ok(None),
            _ => Ok(Some(result?)),
        }
    }

    async fn create_product(&self, product: &Product) -> ServiceResult<Product> {
        let request =
            Self::json_request(Method::POST, self.url(&[]), &ProductDto::from_domain(product))?;
        let result = self.fetcher().fetch(request, parse_product).await;

        match status_of(&result) {
            Some(409) => Err(ServiceError::ProductExists(product.id().clone())),
            _ => Ok(result?),
        }
    }

    async fn update_product(&self, product: &Product) -> ServiceResult<Product> {
        let request = Self::json_request(
            Method::PUT,
            self.url(&[product.id().as_str()]),
            &ProductDto::from_domain(product),
        )?;
        let result = self.fetcher().fetch(request, parse_product).await;

        match status_of(&result) {
            Some(404) => Err(ServiceError::ProductNotFound(product.id().clone())),
            _ => Ok(result?),
        }
    }

    async fn delete_product(&self, product_id: &ProductId) -> ServiceResult<()> {
        let result = self
            .fetcher()
            .send(HttpRequest::delete(self.url(&[product_id.as_str()])))
            .await;

        match status_of(&result) {
            Some(404) => Err(ServiceError::ProductNotFound(product_id.clone())),
            _ => result.map(|_| ()).map_err(ServiceError::from),
        }
    }

    async fn add_stash_item(
        &self,
        product_id: &ProductId,
        stash_item: &StashItem,
    ) -> ServiceResult<()> {
        let request = Self::json_request(
            Method::POST,
            self.url(&[product_id.as_str(), "stash_items"]),
            &StashItemDto::from_domain(stash_item),
        )?;
        let result = self.fetcher().send(request).await;

        match status_of(&result) {
            Some(404) => Err(ServiceError::ProductNotFound(product_id.clone())),
            Some(409) => Err(ServiceError::StashItemExists(stash_item.id().clone())),
            _ => result.map(|_| ()).map_err(ServiceError::from),
        }
    }

    async fn update_stash_item(
        &self,
        product_id: &ProductId,
        stash_item: &StashItem,
    ) -> ServiceResult<StashItem> {
        let request = Self::json_request(
            Method::PUT,
            self.url(&[product_id.as_str(), "stash_items", stash_item.id().as_str()]),
            &StashItemDto::from_domain(stash_item),
        )?;
        let result = self.fetcher().fetch(request, parse_stash_item).await;

        match (status_of(&result), result) {
            (Some(404), Err(err)) => Err(ServiceError::NotFound(body_of(err))),
            (Some(409), Err(err)) => Err(ServiceError::Conflict(body_of(err))),
            (_, result) => Ok(result?),
        }
    }

    async fn delete_stash_item(
        &self,
        product_id: &ProductId,
        stash_item_id: &StashItemId,
    ) -> ServiceResult<()> {
        let result = self
            .fetcher()
            .send(HttpRequest::delete(self.url(&[
                product_id.as_str(),
                "stash_items",
                stash_item_id.as_str(),
            ])))
            .await;

        match (status_of(&result), result) {
            (Some(404), Err(err)) => Err(ServiceError::NotFound(body_of(err))),
            (_, result) => result.map(|_| ()).map_err(ServiceError::from),
        }
    }

    async fn get_product_by_stash_item_id(
        &self,
        stash_item_id: &StashItemId,
    ) -> ServiceResult<Option<Product>> {
        let result = self
            .fetcher()
            .fetch(
                HttpRequest::get(self.url(&["by_stash_item_id", stash_item_id.as_str()])),
                parse_product,
            )
            .await;

        match status_of(&result) {
            Some(404) => Ok(None),
            _ => Ok(Some(result?)),
        }
    }

    async fn get_products_expiring_before(
        &self,
        date: &PlainDate,
    ) -> ServiceResult<Vec<Product>> {
        let date = date.to_string();
        Ok(self
            .fetcher()
            .fetch(
                HttpRequest::get(self.url(&["expiring_before", date.as_str()])),
                parse_products,
            )
            .await?)
    }
}
