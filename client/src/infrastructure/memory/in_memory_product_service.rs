use crate::application::services::{ProductService, ServiceError, ServiceResult};
use crate::domain::{Entity, PlainDate, Product, ProductId, StashItem, StashItemId};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of ProductService (for development/testing).
///
/// Mirrors the backend rules: products keep insertion order, stash item IDs are unique
/// across all products, and a product cannot hold two stash items with the same
/// expiry date.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductService {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }

    /// Snapshot of everything stored
    pub async fn products(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }
}

fn find_mut<'a>(products: &'a mut [Product], id: &ProductId) -> ServiceResult<&'a mut Product> {
    products
        .iter_mut()
        .find(|product| product.id() == id)
        .ok_or_else(|| ServiceError::ProductNotFound(id.clone()))
}

fn duplicate_expiry_date(product: &Product, stash_item: &StashItem) -> bool {
    product
        .stash_items()
        .iter()
        .any(|other| other.id() != stash_item.id() && other.expiry_date() == stash_item.expiry_date())
}

/// Apply the stash item rules to a whole product about to be stored
fn check_stash_items(products: &[Product], product: &Product) -> ServiceResult<()> {
    for (index, stash_item) in product.stash_items().iter().enumerate() {
        let earlier = &product.stash_items()[..index];

        let taken_elsewhere = products.iter().any(|other| {
            other.id() != product.id() && other.stash_item(stash_item.id()).is_some()
        });
        if taken_elsewhere || earlier.iter().any(|item| item.id() == stash_item.id()) {
            return Err(ServiceError::StashItemExists(stash_item.id().clone()));
        }

        if earlier
            .iter()
            .any(|item| item.expiry_date() == stash_item.expiry_date())
        {
            return Err(ServiceError::Conflict(format!(
                "Product {} already has a stash item expiring {}",
                product.id(),
                stash_item.expiry_date()
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl ProductService for InMemoryProductService {
    async fn get_all_products_with_stash_items(&self) -> ServiceResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|product| product.has_stash_items())
            .cloned()
            .collect())
    }

    async fn get_product(&self, product_id: &ProductId) -> ServiceResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|product| product.id() == product_id).cloned())
    }

    async fn create_product(&self, product: &Product) -> ServiceResult<Product> {
        let mut products = self.products.write().await;

        if products.iter().any(|existing| existing.id() == product.id()) {
            return Err(ServiceError::ProductExists(product.id().clone()));
        }
        check_stash_items(&products, product)?;

        products.push(product.clone());
        Ok(product.clone())
    }

    async fn update_product(&self, product: &Product) -> ServiceResult<Product> {
        let mut products = self.products.write().await;
        if !products.iter().any(|existing| existing.id() == product.id()) {
            return Err(ServiceError::ProductNotFound(product.id().clone()));
        }
        check_stash_items(&products, product)?;

        let existing = find_mut(&mut products, product.id())?;

        *existing = product.clone();
        Ok(product.clone())
    }

    async fn delete_product(&self, product_id: &ProductId) -> ServiceResult<()> {
        let mut products = self.products.write().await;
        let position = products
            .iter()
            .position(|product| product.id() == product_id)
            .ok_or_else(|| ServiceError::ProductNotFound(product_id.clone()))?;

        products.remove(position);
        Ok(())
    }

    async fn add_stash_item(
        &self,
        product_id: &ProductId,
        stash_item: &StashItem,
    ) -> ServiceResult<()> {
        let mut products = self.products.write().await;

        if !products.iter().any(|product| product.id() == product_id) {
            return Err(ServiceError::ProductNotFound(product_id.clone()));
        }
        if products
            .iter()
            .any(|product| product.stash_item(stash_item.id()).is_some())
        {
            return Err(ServiceError::StashItemExists(stash_item.id().clone()));
        }

        let product = find_mut(&mut products, product_id)?;
        if duplicate_expiry_date(product, stash_item) {
            return Err(ServiceError::Conflict(format!(
                "Product {} already has a stash item expiring {}",
                product_id,
                stash_item.expiry_date()
            )));
        }

        product
            .add_stash_item(stash_item.clone())
            .map_err(|_| ServiceError::StashItemExists(stash_item.id().clone()))
    }

    async fn update_stash_item(
        &self,
        product_id: &ProductId,
        stash_item: &StashItem,
    ) -> ServiceResult<StashItem> {
        let mut products = self.products.write().await;
        let product = find_mut(&mut products, product_id)?;

        if product.stash_item(stash_item.id()).is_none() {
            return Err(ServiceError::StashItemNotFound(stash_item.id().clone()));
        }
        if duplicate_expiry_date(product, stash_item) {
            return Err(ServiceError::Conflict(format!(
                "Product {} already has a stash item expiring {}",
                product_id,
                stash_item.expiry_date()
            )));
        }

        product
            .replace_stash_item(stash_item.clone())
            .map_err(|_| ServiceError::StashItemNotFound(stash_item.id().clone()))?;
        Ok(stash_item.clone())
    }

    async fn delete_stash_item(
        &self,
        product_id: &ProductId,
        stash_item_id: &StashItemId,
    ) -> ServiceResult<()> {
        let mut products = self.products.write().await;
        let product = find_mut(&mut products, product_id)?;

        product
            .remove_stash_item(stash_item_id)
            .map(|_| ())
            .map_err(|_| ServiceError::StashItemNotFound(stash_item_id.clone()))
    }

    async fn get_product_by_stash_item_id(
        &self,
        stash_item_id: &StashItemId,
    ) -> ServiceResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .find(|product| product.stash_item(stash_item_id).is_some())
            .cloned())
    }

    async fn get_products_expiring_before(
        &self,
        date: &PlainDate,
    ) -> ServiceResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|product| product.expires_before(date))
            .cloned()
            .collect())
    }
}
