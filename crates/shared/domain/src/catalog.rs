//! Catalog entities: categories and products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_PRODUCT_NAME_LENGTH, MIN_PRODUCT_DESCRIPTION_LENGTH, MIN_PRODUCT_NAME_LENGTH,
};
use crate::error::{DomainError, DomainResult};

/// Catalog category (reference data).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Product with its categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: String,
    pub categories: Vec<Category>,
}

/// Compact product view used by paginated search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub img_url: String,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            img_url: product.img_url.clone(),
        }
    }
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            img_url: product.img_url,
        }
    }
}

/// Mutable product fields, used for both insert and update.
///
/// Only category ids are meaningful; names are resolved by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: String,
    pub category_ids: Vec<i64>,
}

impl ProductInput {
    /// Check the invariants storage relies on.
    pub fn validate(&self) -> DomainResult<()> {
        let name_length = self.name.trim().chars().count();
        if !(MIN_PRODUCT_NAME_LENGTH..=MAX_PRODUCT_NAME_LENGTH).contains(&name_length) {
            return Err(DomainError::validation(format!(
                "Name must be between {} and {} characters",
                MIN_PRODUCT_NAME_LENGTH, MAX_PRODUCT_NAME_LENGTH
            )));
        }
        if self.description.chars().count() < MIN_PRODUCT_DESCRIPTION_LENGTH {
            return Err(DomainError::validation(format!(
                "Description must have at least {} characters",
                MIN_PRODUCT_DESCRIPTION_LENGTH
            )));
        }
        if self.price < Decimal::ZERO {
            return Err(DomainError::validation("Price must not be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(price: Decimal) -> ProductInput {
        ProductInput {
            name: "Phone".to_string(),
            description: "Good Phone".to_string(),
            price,
            img_url: "https://img.com/img.png".to_string(),
            category_ids: vec![1],
        }
    }

    #[test]
    fn negative_price_is_rejected() {
        let result = input(Decimal::new(-1, 2)).validate();
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn zero_price_is_accepted() {
        assert!(input(Decimal::ZERO).validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut product = input(Decimal::from(800));
        product.name = "  ".to_string();
        assert!(product.validate().is_err());
    }

    #[test]
    fn name_and_description_lengths_are_checked() {
        let mut product = input(Decimal::from(800));
        product.name = "ab".to_string();
        assert!(product.validate().is_err());

        product.name = "x".repeat(81);
        assert!(product.validate().is_err());

        product.name = "Phone".to_string();
        product.description = "Short".to_string();
        assert!(product.validate().is_err());
    }
}
