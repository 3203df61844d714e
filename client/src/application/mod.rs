pub mod dto;
pub mod forms;
pub mod services;
pub mod use_cases;

pub use dto::{DtoError, DtoResult, ProductDto, StashItemDto};
pub use forms::{FormErrors, ProductForm, ProductFormSubject, StashItemForm};
pub use services::{ErrorResponse, ProductService, ServiceError, ServiceResult};
pub use use_cases::{
    OpenProductEditor, SaveProduct, SaveProductError, StockOverview, StockRow,
};
