use crate::application::dto::DtoError;
use crate::domain::{PlainDate, Product, ProductId, StashItem, StashItemId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// A non-success HTTP response, kept for the caller to inspect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub body: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "HTTP {}", self.status)
        } else {
            write!(f, "HTTP {}: {}", self.status, self.body)
        }
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Product {0} already exists")]
    ProductExists(ProductId),

    #[error("Product {0} does not exist")]
    ProductNotFound(ProductId),

    #[error("Stash item {0} already exists")]
    StashItemExists(StashItemId),

    #[error("Stash item {0} does not exist")]
    StashItemNotFound(StashItemId),

    /// The server reported a conflict, with its explanation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The server reported a missing resource, with its explanation
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected response: {0}")]
    UnexpectedStatus(ErrorResponse),

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] DtoError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Everything the UI can do with products and their stash items.
///
/// Lookups report a missing resource as `Ok(None)`. Mutations of a resource that is
/// expected to exist report it as an error.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// All products with at least one stash item
    async fn get_all_products_with_stash_items(&self) -> ServiceResult<Vec<Product>>;

    async fn get_product(&self, product_id: &ProductId) -> ServiceResult<Option<Product>>;

    /// Fails with `ProductExists` if the ID is taken
    async fn create_product(&self, product: &Product) -> ServiceResult<Product>;

    /// Fails with `ProductNotFound` if there is nothing to update
    async fn update_product(&self, product: &Product) -> ServiceResult<Product>;

    async fn delete_product(&self, product_id: &ProductId) -> ServiceResult<()>;

    async fn add_stash_item(
        &self,
        product_id: &ProductId,
        stash_item: &StashItem,
    ) -> ServiceResult<()>;

    async fn update_stash_item(
        &self,
        product_id: &ProductId,
        stash_item: &StashItem,
    ) -> ServiceResult<StashItem>;

    async fn delete_stash_item(
        &self,
        product_id: &ProductId,
        stash_item_id: &StashItemId,
    ) -> ServiceResult<()>;

    async fn get_product_by_stash_item_id(
        &self,
        stash_item_id: &StashItemId,
    ) -> ServiceResult<Option<Product>>;

    /// Products with a stash item expiring strictly before `date`
    async fn get_products_expiring_before(&self, date: &PlainDate)
        -> ServiceResult<Vec<Product>>;
}
