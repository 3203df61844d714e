use super::{DtoError, DtoResult};
use crate::domain::{DomainResult, PlainDate, Quantity, StashItem, StashItemId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use validator::{Validate, ValidationError};

fn validate_uuid(id: &str) -> Result<(), ValidationError> {
    if !StashItemId::is_valid(id) {
        return Err(ValidationError::new("uuid"));
    }
    Ok(())
}

/// Whole-number floats become integers, so `5.0` and `5` are the same quantity
fn normalize_quantity(number: &Number) -> Number {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 => {
            if value >= 0.0 && value < u64::MAX as f64 {
                Number::from(value as u64)
            } else if value < 0.0 && value >= i64::MIN as f64 {
                Number::from(value as i64)
            } else {
                number.clone()
            }
        }
        _ => number.clone(),
    }
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<Number, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(normalize_quantity(&Number::deserialize(deserializer)?))
}

/// Stash item as sent over the wire
///
/// Quantities compare by numeric value.
#[derive(Debug, Clone, Eq, Serialize, Deserialize, Validate)]
pub struct StashItemDto {
    #[validate(custom(function = "validate_uuid"))]
    pub id: String,
    #[serde(deserialize_with = "deserialize_quantity")]
    pub quantity: Number,
    pub expiry_date: String,
}

impl PartialEq for StashItemDto {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.expiry_date == other.expiry_date
            && normalize_quantity(&self.quantity) == normalize_quantity(&other.quantity)
    }
}

impl StashItemDto {
    /// Check untrusted JSON against the stash item schema
    pub fn parse(value: Value) -> DtoResult<Self> {
        let dto: StashItemDto = serde_json::from_value(value)?;
        dto.validate()?;
        Ok(dto)
    }

    pub fn from_domain(stash_item: &StashItem) -> Self {
        StashItemDto {
            id: stash_item.id().to_string(),
            quantity: Number::from(stash_item.quantity().value()),
            expiry_date: stash_item.expiry_date().to_string(),
        }
    }

    pub fn to_domain(&self) -> DtoResult<StashItem> {
        self.validate()?;

        Ok(StashItem::new(
            StashItemId::new(self.id.as_str())?,
            quantity_from_number(&self.quantity)?,
            PlainDate::new(&self.expiry_date)?,
        ))
    }
}

fn quantity_from_number(number: &Number) -> DomainResult<Quantity> {
    if let Some(value) = number.as_u64() {
        return Ok(Quantity::from_u64(value));
    }
    if let Some(value) = number.as_i64() {
        return Quantity::new(value);
    }
    Quantity::from_f64(number.as_f64().unwrap_or(f64::NAN))
}

impl From<&StashItem> for StashItemDto {
    fn from(stash_item: &StashItem) -> Self {
        StashItemDto::from_domain(stash_item)
    }
}

impl TryFrom<StashItemDto> for StashItem {
    type Error = DtoError;

    fn try_from(dto: StashItemDto) -> Result<Self, Self::Error> {
        dto.to_domain()
    }
}

/// Parse untrusted JSON into a stash item
pub fn parse_stash_item(value: Value) -> DtoResult<StashItem> {
    StashItemDto::parse(value)?.to_domain()
}
