//! Wire representations of the domain and the mapping to and from them.
//!
//! Inbound JSON is checked against the DTO shape first (a `Schema` error), and only
//! then turned into value objects (an `InvalidValue` error).
mod product;
mod stash_item;

pub use product::{parse_product, parse_products, ProductDto};
pub use stash_item::{parse_stash_item, StashItemDto};

use crate::domain::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DtoError {
    #[error("Schema violation: {0}")]
    Schema(String),

    #[error("{0}")]
    InvalidValue(#[from] DomainError),
}

impl From<serde_json::Error> for DtoError {
    fn from(err: serde_json::Error) -> Self {
        DtoError::Schema(err.to_string())
    }
}

impl From<validator::ValidationErrors> for DtoError {
    fn from(err: validator::ValidationErrors) -> Self {
        DtoError::Schema(err.to_string())
    }
}

pub type DtoResult<T> = Result<T, DtoError>;
