/// Domain entities
use super::base::Entity;
use super::value_objects::{PlainDate, Quantity, StashItemId};

/// A StashItem is a batch of units of a product sharing one expiry date.
/// It is never edited in place: a new value is built and swapped into its Product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashItem {
    id: StashItemId,
    quantity: Quantity,
    expiry_date: PlainDate,
}

impl StashItem {
    pub fn new(id: StashItemId, quantity: Quantity, expiry_date: PlainDate) -> Self {
        StashItem {
            id,
            quantity,
            expiry_date,
        }
    }

    /// Create a stash item with a freshly generated ID
    pub fn create(quantity: Quantity, expiry_date: PlainDate) -> Self {
        Self::new(StashItemId::generate(), quantity, expiry_date)
    }

    pub fn id(&self) -> &StashItemId {
        &self.id
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn expiry_date(&self) -> PlainDate {
        self.expiry_date
    }

    /// Same item with another quantity
    pub fn with_quantity(&self, quantity: Quantity) -> Self {
        StashItem {
            quantity,
            ..self.clone()
        }
    }

    pub fn expires_before(&self, date: &PlainDate) -> bool {
        self.expiry_date < *date
    }
}

impl Entity for StashItem {
    type Id = StashItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> PlainDate {
        PlainDate::new(s).unwrap()
    }

    #[test]
    fn test_create_stash_item() {
        let item = StashItem::create(Quantity::from(5), date("2030-01-01"));

        assert!(StashItemId::is_valid(item.id().as_str()));
        assert_eq!(item.quantity().value(), 5);
        assert_eq!(item.expiry_date().to_string(), "2030-01-01");
    }

    #[test]
    fn test_with_quantity_keeps_identity() {
        let item = StashItem::create(Quantity::from(5), date("2030-01-01"));
        let replaced = item.with_quantity(Quantity::from(2));

        assert_eq!(replaced.id(), item.id());
        assert_eq!(replaced.expiry_date(), item.expiry_date());
        assert_eq!(replaced.quantity().value(), 2);
        assert_eq!(item.quantity().value(), 5);
    }

    #[test]
    fn test_expires_before_is_strict() {
        let item = StashItem::create(Quantity::from(1), date("2030-01-01"));

        assert!(item.expires_before(&date("2030-01-02")));
        assert!(!item.expires_before(&date("2030-01-01")));
        assert!(!item.expires_before(&date("2029-12-31")));
    }

    #[test]
    fn test_stash_items_with_same_values_are_equal() {
        let id = StashItemId::generate();
        let a = StashItem::new(id.clone(), Quantity::from(1), date("2030-01-01"));
        let b = StashItem::new(id, Quantity::from(1), date("2030-01-01"));

        assert_eq!(a, b);
    }
}
