//! Admin product form.
//!
//! The form holds raw, possibly invalid input. [`ProductForm::validate`] is the
//! only way to turn it into a request payload, so an invalid form never
//! reaches the network.

use std::fmt;

use rust_decimal::Decimal;
use shopfront_core::{ImagePayload, NewProduct, Price, Product, QuantityError, Stock};
use thiserror::Error;

/// Editable product fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub image: Option<ImagePayload>,
}

/// A single field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Name is required")]
    NameRequired,
    #[error("Price must be greater than 0")]
    PriceNotPositive,
    #[error("Stock cannot be negative")]
    NegativeStock,
    #[error("Stock is too large")]
    StockTooLarge,
}

/// Every validation failure found in a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct FormErrors(Vec<FormError>);

impl FormErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, error: FormError) -> bool {
        self.0.contains(&error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormError> {
        self.0.iter()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl ProductForm {
    /// A form pre-filled from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.amount(),
            stock: i64::from(product.stock.get()),
            image: product.image.clone(),
        }
    }

    /// Check every field and build the payload.
    ///
    /// # Errors
    ///
    /// Returns all field errors at once if any field is invalid.
    pub fn validate(&self) -> Result<NewProduct, FormErrors> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FormError::NameRequired);
        }

        let price = if self.price > Decimal::ZERO {
            Price::new(self.price).ok()
        } else {
            errors.push(FormError::PriceNotPositive);
            None
        };

        let stock = match Stock::new(self.stock) {
            Ok(stock) => Some(stock),
            Err(QuantityError::OutOfRange(_)) => {
                errors.push(FormError::StockTooLarge);
                None
            }
            Err(_) => {
                errors.push(FormError::NegativeStock);
                None
            }
        };

        match (price, stock) {
            (Some(price), Some(stock)) if errors.is_empty() => Ok(NewProduct {
                name: name.to_string(),
                description: self.description.trim().to_string(),
                price,
                stock,
                image: self.image.clone(),
            }),
            _ => Err(FormErrors(errors)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid() -> ProductForm {
        ProductForm {
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: Decimal::new(999, 2),
            stock: 5,
            image: None,
        }
    }

    #[test]
    fn test_valid_form() {
        let product = valid().validate().unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, Price::parse("9.99").unwrap());
        assert_eq!(product.stock.get(), 5);
    }

    #[test]
    fn test_zero_stock_is_valid() {
        let form = ProductForm { stock: 0, ..valid() };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let form = ProductForm {
            name: "   ".to_string(),
            price: Decimal::ZERO,
            stock: -1,
            ..valid()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.contains(FormError::NameRequired));
        assert!(errors.contains(FormError::PriceNotPositive));
        assert!(errors.contains(FormError::NegativeStock));
        assert_eq!(
            errors.to_string(),
            "Name is required; Price must be greater than 0; Stock cannot be negative"
        );
    }

    #[test]
    fn test_oversized_stock_rejected() {
        let form = ProductForm {
            stock: i64::from(u32::MAX) + 1,
            ..valid()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.contains(FormError::StockTooLarge));
        assert!(!errors.contains(FormError::NegativeStock));
        assert_eq!(errors.to_string(), "Stock is too large");
    }

    #[test]
    fn test_negative_price_rejected() {
        let form = ProductForm {
            price: Decimal::new(-5, 0),
            ..valid()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.iter().count(), 1);
    }
}
