use super::{DtoError, DtoResult, StashItemDto};
use crate::domain::{Brand, Entity, Product, ProductId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Product as sent over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProductDto {
    pub id: String,
    pub brand: String,
    pub name: String,
    #[validate(nested)]
    pub stash_items: Vec<StashItemDto>,
}

impl ProductDto {
    /// Check untrusted JSON against the product schema
    pub fn parse(value: Value) -> DtoResult<Self> {
        let dto: ProductDto = serde_json::from_value(value)?;
        dto.validate()?;
        Ok(dto)
    }

    pub fn from_domain(product: &Product) -> Self {
        ProductDto {
            id: product.id().to_string(),
            brand: product.brand().to_string(),
            name: product.name().to_string(),
            stash_items: product
                .stash_items()
                .iter()
                .map(StashItemDto::from_domain)
                .collect(),
        }
    }

    /// Build the domain product, failing on the first field that breaks an invariant
    pub fn to_domain(&self) -> DtoResult<Product> {
        self.validate()?;

        let id = ProductId::new(self.id.as_str())?;
        let brand = Brand::new(self.brand.as_str())?;
        let stash_items = self
            .stash_items
            .iter()
            .map(StashItemDto::to_domain)
            .collect::<DtoResult<Vec<_>>>()?;

        Ok(Product::new(id, brand, self.name.as_str()).with_stash_items(stash_items))
    }
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        ProductDto::from_domain(product)
    }
}

impl TryFrom<ProductDto> for Product {
    type Error = DtoError;

    fn try_from(dto: ProductDto) -> Result<Self, Self::Error> {
        dto.to_domain()
    }
}

/// Parse untrusted JSON into a product
pub fn parse_product(value: Value) -> DtoResult<Product> {
    ProductDto::parse(value)?.to_domain()
}

/// Parse an untrusted JSON array into products
///
/// The whole array is checked against the schema before any element is turned into a
/// domain value, so a schema violation anywhere wins over a value error earlier on.
pub fn parse_products(value: Value) -> DtoResult<Vec<Product>> {
    let dtos: Vec<ProductDto> = serde_json::from_value(value)?;
    for dto in &dtos {
        dto.validate()?;
    }
    dtos.iter().map(ProductDto::to_domain).collect()
}
