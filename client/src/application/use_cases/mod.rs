pub mod product_editor;
pub mod stock_overview;

pub use product_editor::{OpenProductEditor, SaveProduct, SaveProductError};
pub use stock_overview::{StockOverview, StockRow};
