/// Base DDD abstractions for the domain layer
use std::fmt::{self, Debug};

/// Trait for value objects - immutable objects defined by their attributes
/// Value objects are equal if all their attributes are equal
pub trait ValueObject: Clone + PartialEq + Eq + Debug {}

/// Trait for entities - objects with identity
/// Entities are the same entity if their IDs are equal, regardless of other attributes
pub trait Entity: Debug {
    type Id: ValueObject;

    fn id(&self) -> &Self::Id;
}

/// The construction rule a value object rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationRule {
    /// Product IDs (scanned barcodes) cannot be empty
    EmptyProductId,
    /// Brands cannot be empty
    EmptyBrand,
    /// Quantities cannot be negative
    NegativeQuantity,
    /// Quantities must be whole numbers
    NonIntegerQuantity,
    /// Quantity does not fit in the supported range
    QuantityOutOfRange,
    /// Date is not written as YYYY-MM-DD
    MalformedDate,
    /// Date is written as YYYY-MM-DD but names a day that does not exist
    NonexistentDate,
    /// String is not a UUID in 8-4-4-4-12 hex form
    MalformedUuid,
}

impl ValidationRule {
    /// The form field the rule belongs to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationRule::EmptyProductId => "id",
            ValidationRule::EmptyBrand => "brand",
            ValidationRule::NegativeQuantity
            | ValidationRule::NonIntegerQuantity
            | ValidationRule::QuantityOutOfRange => "quantity",
            ValidationRule::MalformedDate | ValidationRule::NonexistentDate => "expiryDate",
            ValidationRule::MalformedUuid => "stashItemId",
        }
    }

    /// Translation key of the message shown next to the offending field
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationRule::EmptyProductId => "product:idIsInvalid",
            ValidationRule::EmptyBrand => "product:brandIsInvalid",
            ValidationRule::NegativeQuantity
            | ValidationRule::NonIntegerQuantity
            | ValidationRule::QuantityOutOfRange => "stashItem:quantityIsInvalid",
            ValidationRule::MalformedDate | ValidationRule::NonexistentDate => {
                "stashItem:expiryDateIsInvalid"
            }
            ValidationRule::MalformedUuid => "stashItem:idIsInvalid",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ValidationRule::EmptyProductId => "product ID cannot be empty",
            ValidationRule::EmptyBrand => "brand cannot be empty",
            ValidationRule::NegativeQuantity => "quantity cannot be negative",
            ValidationRule::NonIntegerQuantity => "quantity must be an integer",
            ValidationRule::QuantityOutOfRange => "quantity is out of range",
            ValidationRule::MalformedDate => "date must be on the format YYYY-MM-DD",
            ValidationRule::NonexistentDate => "date does not exist in the calendar",
            ValidationRule::MalformedUuid => "invalid UUID",
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value object rejected its input
    InvalidValue { rule: ValidationRule, input: String },
    /// Entity not found
    NotFound(String),
    /// Invalid operation
    InvalidOperation(String),
}

impl DomainError {
    pub(crate) fn invalid(rule: ValidationRule, input: impl Into<String>) -> Self {
        DomainError::InvalidValue {
            rule,
            input: input.into(),
        }
    }

    /// The violated rule, if this is a value object failure
    pub fn rule(&self) -> Option<ValidationRule> {
        match self {
            DomainError::InvalidValue { rule, .. } => Some(*rule),
            _ => None,
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::InvalidValue { rule, input } => {
                write!(f, "Invalid value {:?}: {}", input, rule)
            }
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::{Brand, PlainDate, Product, ProductId, Quantity, StashItem};

    fn same_identity<E: Entity>(a: &E, b: &E) -> bool {
        a.id() == b.id()
    }

    #[test]
    fn test_stash_item_identity_survives_replacement() {
        let original = StashItem::create(Quantity::from(1), PlainDate::new("2030-01-01").unwrap());
        let replaced = original.with_quantity(Quantity::from(6));

        assert_ne!(original, replaced);
        assert!(same_identity(&original, &replaced));

        let other = StashItem::create(Quantity::from(1), PlainDate::new("2030-01-01").unwrap());
        assert!(!same_identity(&original, &other));
    }

    #[test]
    fn test_product_identity_is_its_id() {
        let id = ProductId::new("4006381333931").unwrap();
        let mut product = Product::new(id.clone(), Brand::new("Stabilo").unwrap(), "Boss");
        let before = product.clone();

        product.set_details(Brand::new("Stabilo").unwrap(), "Boss Original");

        assert!(same_identity(&before, &product));
        assert_eq!(Entity::id(&product), &id);
    }

    #[test]
    fn test_domain_error_display() {
        let error = DomainError::invalid(ValidationRule::NegativeQuantity, "-1");
        assert_eq!(error.to_string(), "Invalid value \"-1\": quantity cannot be negative");

        let error = DomainError::NotFound("stash item".to_string());
        assert_eq!(error.to_string(), "Not found: stash item");
    }

    #[test]
    fn test_rule_maps_to_field_and_message_key() {
        let error = DomainError::invalid(ValidationRule::NonexistentDate, "2021-02-31");
        let rule = error.rule().unwrap();

        assert_eq!(rule.field(), "expiryDate");
        assert_eq!(rule.message_key(), "stashItem:expiryDateIsInvalid");
        assert_eq!(ValidationRule::EmptyBrand.field(), "brand");
        assert!(DomainError::InvalidOperation("x".to_string()).rule().is_none());
    }
}
