mod in_memory_product_service;

pub use in_memory_product_service::InMemoryProductService;
