use crate::application::forms::{FormErrors, ProductForm, ProductFormSubject};
use crate::application::services::{ProductService, ServiceError, ServiceResult};
use crate::domain::{Product, ProductId};
use thiserror::Error;

/// Use case for opening the editor after a product ID was scanned or typed in
///
/// An unknown ID opens an empty form for a new product with that ID, a known one opens
/// the stored product for editing.
pub struct OpenProductEditor<'a, S: ProductService + ?Sized> {
    service: &'a S,
}

impl<'a, S: ProductService + ?Sized> OpenProductEditor<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    pub async fn execute(&self, product_id: &ProductId) -> ServiceResult<ProductFormSubject> {
        Ok(match self.service.get_product(product_id).await? {
            Some(product) => ProductFormSubject::Existing(product),
            None => ProductFormSubject::NewWithId(product_id.clone()),
        })
    }
}

#[derive(Error, Debug)]
pub enum SaveProductError {
    #[error(transparent)]
    Invalid(#[from] FormErrors),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Use case for submitting the product editor
///
/// Validates the form, then creates the product when the form was opened for a new ID
/// and replaces the stored product otherwise.
pub struct SaveProduct<'a, S: ProductService + ?Sized> {
    service: &'a S,
}

impl<'a, S: ProductService + ?Sized> SaveProduct<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    pub async fn execute(
        &self,
        subject: &ProductFormSubject,
        form: &ProductForm,
    ) -> Result<Product, SaveProductError> {
        let product = form.submit()?;

        let saved = if subject.is_new() {
            self.service.create_product(&product).await?
        } else {
            self.service.update_product(&product).await?
        };

        Ok(saved)
    }
}
