//! Entry forms for products and stash items.
//!
//! Forms hold raw user input and only produce domain values on `submit`. Besides the
//! value object invariants they enforce the entry rules of the UI, such as requiring a
//! quantity greater than zero even though a zero `Quantity` is a legal value.
use crate::domain::{
    Brand, DomainError, DomainResult, Entity, PlainDate, Product, ProductId, Quantity,
    StashItem, StashItemId,
};
use std::collections::BTreeMap;
use std::fmt;

pub const ID_IS_REQUIRED: &str = "product:idIsRequired";
pub const BRAND_IS_REQUIRED: &str = "product:brandIsRequired";
pub const NAME_IS_REQUIRED: &str = "product:nameIsRequired";
pub const QUANTITY_IS_REQUIRED: &str = "stashItem:quantityIsRequired";
pub const QUANTITY_MUST_BE_GREATER_THAN_ZERO: &str = "stashItem:quantityMustBeGreaterThanZero";
pub const EXPIRY_DATE_IS_REQUIRED: &str = "stashItem:expiryDateIsRequired";

/// What the product editor is opened on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFormSubject {
    /// No product exists for the scanned ID yet
    NewWithId(ProductId),
    /// Editing a product that already exists
    Existing(Product),
}

impl ProductFormSubject {
    pub fn product_id(&self) -> &ProductId {
        match self {
            ProductFormSubject::NewWithId(id) => id,
            ProductFormSubject::Existing(product) => product.id(),
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, ProductFormSubject::NewWithId(_))
    }
}

/// Field-specific validation failures, keyed by field path, valued by message key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<String, &'static str>,
}

impl FormErrors {
    fn insert(&mut self, field: impl Into<String>, message_key: &'static str) {
        self.errors.insert(field.into(), message_key);
    }

    /// Message key for a field, if it failed
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.errors.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.errors.iter().map(|(field, key)| (field.as_str(), *key))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .iter()
            .map(|(field, key)| format!("{field}: {key}"))
            .collect();
        write!(f, "Invalid form ({})", fields.join(", "))
    }
}

impl std::error::Error for FormErrors {}

fn message_key(err: &DomainError) -> &'static str {
    err.rule()
        .map(|rule| rule.message_key())
        .unwrap_or("unknownError")
}

fn check_quantity(quantity: Option<f64>) -> Result<Quantity, &'static str> {
    let value = quantity.ok_or(QUANTITY_IS_REQUIRED)?;
    if value < 1.0 {
        return Err(QUANTITY_MUST_BE_GREATER_THAN_ZERO);
    }
    Quantity::from_f64(value).map_err(|err| message_key(&err))
}

fn check_expiry_date(expiry_date: &str) -> Result<PlainDate, &'static str> {
    if expiry_date.is_empty() {
        return Err(EXPIRY_DATE_IS_REQUIRED);
    }
    PlainDate::new(expiry_date).map_err(|err| message_key(&err))
}

/// One editable stash item row of the product form
#[derive(Debug, Clone, PartialEq)]
pub struct StashItemRow {
    id: StashItemId,
    expiry_date: String,
    quantity: Option<f64>,
    is_new: bool,
}

impl StashItemRow {
    pub fn id(&self) -> &StashItemId {
        &self.id
    }

    pub fn expiry_date(&self) -> &str {
        &self.expiry_date
    }

    pub fn quantity(&self) -> Option<f64> {
        self.quantity
    }

    /// Rows loaded from an existing product have a fixed expiry date
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    fn field(&self, name: &str) -> String {
        format!("stashItems.{}.{}", self.id, name)
    }
}

/// Form state of the product editor
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    id: String,
    id_editable: bool,
    pub brand: String,
    pub name: String,
    rows: Vec<StashItemRow>,
}

impl ProductForm {
    pub fn new(subject: &ProductFormSubject) -> Self {
        match subject {
            ProductFormSubject::NewWithId(id) => ProductForm {
                id: id.to_string(),
                id_editable: true,
                brand: String::new(),
                name: String::new(),
                rows: Vec::new(),
            },
            ProductFormSubject::Existing(product) => ProductForm {
                id: product.id().to_string(),
                id_editable: false,
                brand: product.brand().to_string(),
                name: product.name().to_string(),
                rows: product
                    .stash_items()
                    .iter()
                    .map(|item| StashItemRow {
                        id: item.id().clone(),
                        expiry_date: item.expiry_date().to_string(),
                        quantity: Some(item.quantity().value() as f64),
                        is_new: false,
                    })
                    .collect(),
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn id_editable(&self) -> bool {
        self.id_editable
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> DomainResult<()> {
        if !self.id_editable {
            return Err(DomainError::InvalidOperation(
                "The ID of an existing product cannot be changed".to_string(),
            ));
        }
        self.id = id.into();
        Ok(())
    }

    pub fn rows(&self) -> &[StashItemRow] {
        &self.rows
    }

    /// Append an empty row with a fresh ID and a quantity of one
    pub fn add_stash_item_row(&mut self) -> StashItemId {
        let id = StashItemId::generate();
        self.rows.push(StashItemRow {
            id: id.clone(),
            expiry_date: String::new(),
            quantity: Some(1.0),
            is_new: true,
        });
        id
    }

    /// Returns false if no row has the ID
    pub fn remove_stash_item_row(&mut self, id: &StashItemId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        self.rows.len() != before
    }

    fn row_mut(&mut self, id: &StashItemId) -> DomainResult<&mut StashItemRow> {
        self.rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(|| DomainError::NotFound(format!("Stash item row {}", id)))
    }

    pub fn set_row_expiry_date(
        &mut self,
        id: &StashItemId,
        expiry_date: impl Into<String>,
    ) -> DomainResult<()> {
        let row = self.row_mut(id)?;
        if !row.is_new {
            return Err(DomainError::InvalidOperation(format!(
                "The expiry date of stash item {} cannot be changed",
                id
            )));
        }
        row.expiry_date = expiry_date.into();
        Ok(())
    }

    pub fn set_row_quantity(&mut self, id: &StashItemId, quantity: Option<f64>) -> DomainResult<()> {
        self.row_mut(id)?.quantity = quantity;
        Ok(())
    }

    pub fn increment_row_quantity(&mut self, id: &StashItemId) -> DomainResult<()> {
        let row = self.row_mut(id)?;
        row.quantity = Some(row.quantity.unwrap_or(0.0) + 1.0);
        Ok(())
    }

    pub fn decrement_row_quantity(&mut self, id: &StashItemId) -> DomainResult<()> {
        let row = self.row_mut(id)?;
        row.quantity = Some(row.quantity.unwrap_or(0.0) - 1.0);
        Ok(())
    }

    /// Validate every field and build the product, rows in display order
    pub fn submit(&self) -> Result<Product, FormErrors> {
        let mut errors = FormErrors::default();

        let id = if self.id.is_empty() {
            errors.insert("id", ID_IS_REQUIRED);
            None
        } else {
            ProductId::new(self.id.as_str())
                .map_err(|err| errors.insert("id", message_key(&err)))
                .ok()
        };

        let brand = if self.brand.is_empty() {
            errors.insert("brand", BRAND_IS_REQUIRED);
            None
        } else {
            Brand::new(self.brand.as_str())
                .map_err(|err| errors.insert("brand", message_key(&err)))
                .ok()
        };

        if self.name.is_empty() {
            errors.insert("name", NAME_IS_REQUIRED);
        }

        let mut stash_items = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let expiry_date = check_expiry_date(&row.expiry_date)
                .map_err(|key| errors.insert(row.field("expiryDate"), key))
                .ok();
            let quantity = check_quantity(row.quantity)
                .map_err(|key| errors.insert(row.field("quantity"), key))
                .ok();

            if let (Some(expiry_date), Some(quantity)) = (expiry_date, quantity) {
                stash_items.push(StashItem::new(row.id.clone(), quantity, expiry_date));
            }
        }

        match (id, brand) {
            (Some(id), Some(brand)) if errors.is_empty() => {
                Ok(Product::new(id, brand, self.name.as_str()).with_stash_items(stash_items))
            }
            _ => Err(errors),
        }
    }
}

/// Form state for adding or editing a single stash item
#[derive(Debug, Clone, PartialEq)]
pub struct StashItemForm {
    id: Option<StashItemId>,
    pub quantity: Option<f64>,
    pub expiry_date: String,
}

impl StashItemForm {
    /// Empty form for a new stash item
    pub fn new() -> Self {
        StashItemForm {
            id: None,
            quantity: Some(1.0),
            expiry_date: String::new(),
        }
    }

    /// Form pre-filled from an existing stash item, keeping its ID
    pub fn for_existing(stash_item: &StashItem) -> Self {
        StashItemForm {
            id: Some(stash_item.id().clone()),
            quantity: Some(stash_item.quantity().value() as f64),
            expiry_date: stash_item.expiry_date().to_string(),
        }
    }

    pub fn submit(&self) -> Result<StashItem, FormErrors> {
        let mut errors = FormErrors::default();

        let quantity = check_quantity(self.quantity)
            .map_err(|key| errors.insert("quantity", key))
            .ok();
        let expiry_date = check_expiry_date(&self.expiry_date)
            .map_err(|key| errors.insert("expiryDate", key))
            .ok();

        match (quantity, expiry_date) {
            (Some(quantity), Some(expiry_date)) => {
                let id = self.id.clone().unwrap_or_else(StashItemId::generate);
                Ok(StashItem::new(id, quantity, expiry_date))
            }
            _ => Err(errors),
        }
    }
}

impl Default for StashItemForm {
    fn default() -> Self {
        Self::new()
    }
}
