/// Domain aggregates
use super::base::{DomainError, DomainResult, Entity};
use super::entities::StashItem;
use super::value_objects::{Brand, PlainDate, ProductId, StashItemId};

/// A Product is the aggregate root of the inventory: a scanned item type
/// that exclusively owns an ordered list of stash items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    brand: Brand,
    name: String,
    stash_items: Vec<StashItem>,
}

impl Product {
    pub fn new(id: ProductId, brand: Brand, name: impl Into<String>) -> Self {
        Product {
            id,
            brand,
            name: name.into(),
            stash_items: Vec::new(),
        }
    }

    /// Replace the whole stash item list, keeping the given order
    pub fn with_stash_items(mut self, stash_items: Vec<StashItem>) -> Self {
        self.stash_items = stash_items;
        self
    }

    pub fn brand(&self) -> &Brand {
        &self.brand
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stash_items(&self) -> &[StashItem] {
        &self.stash_items
    }

    pub fn has_stash_items(&self) -> bool {
        !self.stash_items.is_empty()
    }

    /// Update brand and name, keeping identity and stash items
    pub fn set_details(&mut self, brand: Brand, name: impl Into<String>) {
        self.brand = brand;
        self.name = name.into();
    }

    pub fn stash_item(&self, id: &StashItemId) -> Option<&StashItem> {
        self.stash_items.iter().find(|item| item.id() == id)
    }

    /// Append a stash item
    pub fn add_stash_item(&mut self, stash_item: StashItem) -> DomainResult<()> {
        if self.stash_item(stash_item.id()).is_some() {
            return Err(DomainError::InvalidOperation(format!(
                "Stash item {} already exists in product {}",
                stash_item.id(),
                self.id
            )));
        }
        self.stash_items.push(stash_item);
        Ok(())
    }

    /// Swap in a new value for the stash item with the same ID, keeping its position.
    /// Returns the replaced value.
    pub fn replace_stash_item(&mut self, stash_item: StashItem) -> DomainResult<StashItem> {
        let slot = self
            .stash_items
            .iter_mut()
            .find(|item| item.id() == stash_item.id())
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "Stash item {} in product {}",
                    stash_item.id(),
                    self.id
                ))
            })?;

        Ok(std::mem::replace(slot, stash_item))
    }

    /// Remove a stash item by ID, returning it
    pub fn remove_stash_item(&mut self, id: &StashItemId) -> DomainResult<StashItem> {
        let position = self
            .stash_items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| {
                DomainError::NotFound(format!("Stash item {} in product {}", id, self.id))
            })?;

        Ok(self.stash_items.remove(position))
    }

    /// Sum of all stash item quantities
    pub fn total_quantity(&self) -> u64 {
        self.stash_items
            .iter()
            .map(|item| item.quantity().value())
            .fold(0, u64::saturating_add)
    }

    /// Earliest expiry date among the stash items
    pub fn next_expiry_date(&self) -> Option<PlainDate> {
        self.stash_items.iter().map(StashItem::expiry_date).min()
    }

    /// Whether any stash item expires strictly before the given date
    pub fn expires_before(&self, date: &PlainDate) -> bool {
        self.stash_items.iter().any(|item| item.expires_before(date))
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Quantity;

    fn date(s: &str) -> PlainDate {
        PlainDate::new(s).unwrap()
    }

    fn item(quantity: u32, expiry: &str) -> StashItem {
        StashItem::create(Quantity::from(quantity), date(expiry))
    }

    fn product() -> Product {
        Product::new(
            ProductId::new("ABC123").unwrap(),
            Brand::new("Acme").unwrap(),
            "Widget",
        )
    }

    #[test]
    fn test_create_product() {
        let product = product();

        assert_eq!(product.id().as_str(), "ABC123");
        assert_eq!(product.brand().as_str(), "Acme");
        assert_eq!(product.name(), "Widget");
        assert!(!product.has_stash_items());
        assert_eq!(product.next_expiry_date(), None);
        assert_eq!(product.total_quantity(), 0);
    }

    #[test]
    fn test_add_stash_items_keeps_order() {
        let mut product = product();
        let first = item(1, "2030-05-01");
        let second = item(2, "2030-01-01");

        product.add_stash_item(first.clone()).unwrap();
        product.add_stash_item(second.clone()).unwrap();

        assert_eq!(product.stash_items(), &[first, second]);
        assert_eq!(product.total_quantity(), 3);
        assert_eq!(product.next_expiry_date(), Some(date("2030-01-01")));
    }

    #[test]
    fn test_add_duplicate_stash_item_rejected() {
        let mut product = product();
        let first = item(1, "2030-05-01");

        product.add_stash_item(first.clone()).unwrap();
        let result = product.add_stash_item(first);

        assert!(matches!(result, Err(DomainError::InvalidOperation(_))));
        assert_eq!(product.stash_items().len(), 1);
    }

    #[test]
    fn test_replace_stash_item_keeps_position() {
        let mut product = product().with_stash_items(vec![
            item(1, "2030-01-01"),
            item(2, "2030-02-01"),
            item(3, "2030-03-01"),
        ]);
        let target = product.stash_items()[1].clone();

        let old = product
            .replace_stash_item(target.with_quantity(Quantity::from(9)))
            .unwrap();

        assert_eq!(old, target);
        assert_eq!(product.stash_items()[1].id(), target.id());
        assert_eq!(product.stash_items()[1].quantity().value(), 9);
        assert_eq!(product.total_quantity(), 13);
    }

    #[test]
    fn test_replace_missing_stash_item_fails() {
        let mut product = product();
        let result = product.replace_stash_item(item(1, "2030-01-01"));

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_remove_stash_item() {
        let first = item(1, "2030-01-01");
        let second = item(2, "2030-02-01");
        let mut product = product().with_stash_items(vec![first.clone(), second.clone()]);

        let removed = product.remove_stash_item(first.id()).unwrap();

        assert_eq!(removed, first);
        assert_eq!(product.stash_items(), &[second]);
        assert!(product.remove_stash_item(first.id()).is_err());
    }

    #[test]
    fn test_expires_before() {
        let product = product().with_stash_items(vec![item(1, "2030-01-01")]);

        assert!(product.expires_before(&date("2030-01-02")));
        assert!(!product.expires_before(&date("2030-01-01")));
    }

    #[test]
    fn test_set_details() {
        let mut product = product().with_stash_items(vec![item(1, "2030-01-01")]);
        product.set_details(Brand::new("Other").unwrap(), "Gadget");

        assert_eq!(product.brand().as_str(), "Other");
        assert_eq!(product.name(), "Gadget");
        assert_eq!(product.stash_items().len(), 1);
    }
}
