/// Value objects for the domain layer
use super::base::{DomainError, DomainResult, ValidationRule, ValueObject};
use chrono::{DateTime, Days, NaiveDate, Utc};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use uuid::Uuid;

static PLAIN_DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

const PLAIN_DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifier of a Product, the scanned barcode
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::invalid(ValidationRule::EmptyProductId, id));
        }
        Ok(ProductId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ProductId {}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductId::new(s)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Brand of a product
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Brand(String);

impl Brand {
    pub fn new(brand: impl Into<String>) -> DomainResult<Self> {
        let brand = brand.into();
        if brand.is_empty() {
            return Err(DomainError::invalid(ValidationRule::EmptyBrand, brand));
        }
        Ok(Brand(brand))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Brand {}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of stashed units. Zero is allowed, negative and fractional counts are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quantity(u64);

impl Quantity {
    pub fn new(value: i64) -> DomainResult<Self> {
        if value < 0 {
            return Err(DomainError::invalid(
                ValidationRule::NegativeQuantity,
                value.to_string(),
            ));
        }
        Ok(Quantity(value.unsigned_abs()))
    }

    /// Build a quantity from a JSON-style number, which may carry a fraction
    pub fn from_f64(value: f64) -> DomainResult<Self> {
        if value < 0.0 {
            return Err(DomainError::invalid(
                ValidationRule::NegativeQuantity,
                value.to_string(),
            ));
        }
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(DomainError::invalid(
                ValidationRule::NonIntegerQuantity,
                value.to_string(),
            ));
        }
        // u64::MAX as f64 rounds up to 2^64, which is itself out of range
        if value >= u64::MAX as f64 {
            return Err(DomainError::invalid(
                ValidationRule::QuantityOutOfRange,
                value.to_string(),
            ));
        }
        Ok(Quantity(value as u64))
    }

    pub fn from_u64(value: u64) -> Self {
        Quantity(value)
    }

    pub fn zero() -> Self {
        Quantity(0)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn increment(&self) -> Self {
        Quantity(self.0.saturating_add(1))
    }

    /// Returns None when already at zero
    pub fn decrement(&self) -> Option<Self> {
        self.0.checked_sub(1).map(Quantity)
    }
}

impl ValueObject for Quantity {}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Quantity(u64::from(value))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A calendar date without time or timezone, rendered as YYYY-MM-DD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlainDate(NaiveDate);

impl PlainDate {
    /// Parse a date written exactly as YYYY-MM-DD.
    ///
    /// The string must also survive a round trip through the calendar, so `2021-02-31`
    /// is rejected instead of being rolled forward into March.
    pub fn new(date: impl AsRef<str>) -> DomainResult<Self> {
        let date = date.as_ref();
        if !PLAIN_DATE_PATTERN.is_match(date) {
            return Err(DomainError::invalid(ValidationRule::MalformedDate, date));
        }

        let parsed = NaiveDate::parse_from_str(date, PLAIN_DATE_FORMAT)
            .map_err(|_| DomainError::invalid(ValidationRule::NonexistentDate, date))?;

        if parsed.format(PLAIN_DATE_FORMAT).to_string() != date {
            return Err(DomainError::invalid(ValidationRule::NonexistentDate, date));
        }

        Ok(PlainDate(parsed))
    }

    /// Truncate a timestamp to its (UTC) calendar date
    pub fn from_datetime(timestamp: &DateTime<Utc>) -> Self {
        PlainDate(timestamp.date_naive())
    }

    pub fn from_naive_date(date: NaiveDate) -> Self {
        PlainDate(date)
    }

    pub fn today() -> Self {
        Self::from_datetime(&Utc::now())
    }

    /// Returns None if the result would leave the supported calendar range
    pub fn add_days(&self, days: u64) -> Option<Self> {
        self.0.checked_add_days(Days::new(days)).map(PlainDate)
    }

    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl ValueObject for PlainDate {}

impl FromStr for PlainDate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlainDate::new(s)
    }
}

impl fmt::Display for PlainDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(PLAIN_DATE_FORMAT))
    }
}

/// Identifier of a StashItem: a UUID in canonical 8-4-4-4-12 hex form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StashItemId(String);

impl StashItemId {
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if !UUID_PATTERN.is_match(&id) {
            return Err(DomainError::invalid(ValidationRule::MalformedUuid, id));
        }
        Ok(StashItemId(id))
    }

    /// Generate a fresh random (v4) identifier
    pub fn generate() -> Self {
        StashItemId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the string has the shape of a stash item id
    pub fn is_valid(id: &str) -> bool {
        UUID_PATTERN.is_match(id)
    }
}

impl ValueObject for StashItemId {}

impl FromStr for StashItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StashItemId::new(s)
    }
}

impl fmt::Display for StashItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_product_id_creation() {
        let id = ProductId::new("7038010009457").unwrap();
        assert_eq!(id.as_str(), "7038010009457");
        assert_eq!(id.to_string(), "7038010009457");

        let empty_id = ProductId::new("");
        assert_eq!(
            empty_id.unwrap_err().rule(),
            Some(ValidationRule::EmptyProductId)
        );
    }

    #[test]
    fn test_product_id_value_equality() {
        assert_eq!(ProductId::new("1").unwrap(), ProductId::new("1").unwrap());
        assert_ne!(ProductId::new("1").unwrap(), ProductId::new("2").unwrap());
    }

    #[test]
    fn test_brand_creation() {
        let brand = Brand::new("Tine").unwrap();
        assert_eq!(brand.as_str(), "Tine");
        assert_eq!(brand.to_string(), "Tine");

        assert_eq!(
            Brand::new("").unwrap_err().rule(),
            Some(ValidationRule::EmptyBrand)
        );
    }

    #[test]
    fn test_quantity_accepts_zero_and_positive() {
        assert_eq!(Quantity::new(0).unwrap().value(), 0);
        assert!(Quantity::new(0).unwrap().is_zero());
        assert_eq!(Quantity::new(12).unwrap().value(), 12);
        assert_eq!(Quantity::from_f64(3.0).unwrap().value(), 3);
    }

    #[test]
    fn test_quantity_rejects_negative() {
        assert_eq!(
            Quantity::new(-1).unwrap_err().rule(),
            Some(ValidationRule::NegativeQuantity)
        );
        // Sign is checked before integrality
        assert_eq!(
            Quantity::from_f64(-1.5).unwrap_err().rule(),
            Some(ValidationRule::NegativeQuantity)
        );
    }

    #[test]
    fn test_quantity_rejects_non_integer() {
        assert_eq!(
            Quantity::from_f64(1.5).unwrap_err().rule(),
            Some(ValidationRule::NonIntegerQuantity)
        );
        assert_eq!(
            Quantity::from_f64(f64::NAN).unwrap_err().rule(),
            Some(ValidationRule::NonIntegerQuantity)
        );
        assert_eq!(
            Quantity::from_f64(1e20).unwrap_err().rule(),
            Some(ValidationRule::QuantityOutOfRange)
        );
    }

    #[test]
    fn test_quantity_increment_and_decrement() {
        let one = Quantity::from(1);
        assert_eq!(one.increment().value(), 2);
        assert_eq!(one.decrement(), Some(Quantity::zero()));
        assert_eq!(Quantity::zero().decrement(), None);
    }

    #[test]
    fn test_plain_date_valid() {
        let date = PlainDate::new("2021-01-01").unwrap();
        assert_eq!(date.to_string(), "2021-01-01");

        let leap_day = PlainDate::new("2024-02-29").unwrap();
        assert_eq!(leap_day.to_string(), "2024-02-29");
    }

    #[test]
    fn test_plain_date_rejects_wrong_grouping() {
        assert_eq!(
            PlainDate::new("2021-1-1").unwrap_err().rule(),
            Some(ValidationRule::MalformedDate)
        );
        assert!(PlainDate::new("2021-01-01T00:00:00Z").is_err());
        assert!(PlainDate::new("").is_err());
    }

    #[test]
    fn test_plain_date_rejects_nonexistent_day() {
        assert_eq!(
            PlainDate::new("2021-02-31").unwrap_err().rule(),
            Some(ValidationRule::NonexistentDate)
        );
        assert!(PlainDate::new("2023-02-29").is_err());
        assert!(PlainDate::new("2021-13-01").is_err());
        assert!(PlainDate::new("2021-04-31").is_err());
    }

    #[test]
    fn test_plain_date_from_datetime_truncates() {
        let timestamp = Utc.with_ymd_and_hms(2021, 1, 1, 23, 59, 59).unwrap();
        let date = PlainDate::from_datetime(&timestamp);
        assert_eq!(date.to_string(), "2021-01-01");
    }

    #[test]
    fn test_plain_date_ordering_and_arithmetic() {
        let earlier = PlainDate::new("2021-12-31").unwrap();
        let later = PlainDate::new("2022-01-01").unwrap();
        assert!(earlier < later);
        assert_eq!(earlier.add_days(1), Some(later));
    }

    #[test]
    fn test_stash_item_id_accepts_canonical_form() {
        let raw = "0b7a3c8e-4f2d-4c1a-9e3b-6d5f8a2c1e90";
        let id = StashItemId::new(raw).unwrap();
        assert_eq!(id.as_str(), raw);
        assert_eq!(id.to_string(), raw);

        let upper = "0B7A3C8E-4F2D-4C1A-9E3B-6D5F8A2C1E90";
        assert_eq!(StashItemId::new(upper).unwrap().as_str(), upper);
    }

    #[test]
    fn test_stash_item_id_rejects_malformed() {
        // One character short
        assert!(StashItemId::new("0b7a3c8e-4f2d-4c1a-9e3b-6d5f8a2c1e9").is_err());
        // Non-hex character
        assert!(StashItemId::new("0b7a3c8e-4f2d-4c1a-9e3b-6d5f8a2c1e9g").is_err());
        // Hyphen-less form is not canonical
        assert!(StashItemId::new("0b7a3c8e4f2d4c1a9e3b6d5f8a2c1e90").is_err());
        assert_eq!(
            StashItemId::new("").unwrap_err().rule(),
            Some(ValidationRule::MalformedUuid)
        );
    }

    #[test]
    fn test_stash_item_id_generate() {
        let first = StashItemId::generate();
        let second = StashItemId::generate();
        assert!(StashItemId::is_valid(first.as_str()));
        assert_ne!(first, second);
    }
}
