use crate::application::services::{ProductService, ServiceResult};
use crate::domain::{Brand, Entity, PlainDate, Product, ProductId};
use std::cmp::Ordering;

/// One line of the stock overview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRow {
    pub product_id: ProductId,
    pub brand: Brand,
    pub name: String,
    pub total_quantity: u64,
    pub next_expiry_date: Option<PlainDate>,
}

impl From<&Product> for StockRow {
    fn from(product: &Product) -> Self {
        StockRow {
            product_id: product.id().clone(),
            brand: product.brand().clone(),
            name: product.name().to_string(),
            total_quantity: product.total_quantity(),
            next_expiry_date: product.next_expiry_date(),
        }
    }
}

/// Use case for listing what is in stock, soonest expiry first
pub struct StockOverview<'a, S: ProductService + ?Sized> {
    service: &'a S,
}

impl<'a, S: ProductService + ?Sized> StockOverview<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// All products that have at least one stash item
    pub async fn execute(&self) -> ServiceResult<Vec<StockRow>> {
        let products = self.service.get_all_products_with_stash_items().await?;
        Ok(to_rows(&products))
    }

    /// Products with a stash item expiring strictly before `date`
    pub async fn expiring_before(&self, date: &PlainDate) -> ServiceResult<Vec<StockRow>> {
        let products = self.service.get_products_expiring_before(date).await?;
        Ok(to_rows(&products))
    }

    /// Products with a stash item expiring within the next `days` days, counted from today
    pub async fn expiring_within(&self, days: u64) -> ServiceResult<Vec<StockRow>> {
        self.expiring_within_from(PlainDate::today(), days).await
    }

    async fn expiring_within_from(
        &self,
        today: PlainDate,
        days: u64,
    ) -> ServiceResult<Vec<StockRow>> {
        match today.add_days(days) {
            Some(date) => self.expiring_before(&date).await,
            // Past the end of the calendar everything expires "within" the window
            None => self.execute().await,
        }
    }
}

fn to_rows(products: &[Product]) -> Vec<StockRow> {
    let mut rows: Vec<StockRow> = products.iter().map(StockRow::from).collect();
    rows.sort_by(|a, b| {
        let by_expiry = match (a.next_expiry_date, b.next_expiry_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_expiry.then_with(|| a.product_id.as_str().cmp(b.product_id.as_str()))
    });
    rows
}
