//! Persistent entities of the warehouse data layer.
//!
//! Every table carries an `i64` surrogate key (0 until the row is inserted)
//! and the four audit columns maintained by [`crate::audit`].

use rust_decimal::Decimal;
use validator::{Validate, ValidationError};

pub mod category;
pub mod inventory_item;
pub mod location;
pub mod order;
pub mod order_item;
pub mod product;
pub mod stock_movement;
pub mod supplier;

pub use inventory_item::Entity as InventoryItem;
pub use location::Entity as Location;
pub use order::{Entity as Order, OrderStatus, OrderWithItems};
pub use order_item::Entity as OrderItem;
pub use product::Entity as Product;
pub use category::Entity as Category;
pub use stock_movement::{Entity as StockMovement, MovementType};
pub use supplier::Entity as Supplier;

/// Behaviour shared by all entity models that go through the generic repository.
pub trait Persistable: Validate + Clone + Send + Sync {
    /// Human readable entity name used in error messages and logs.
    const NAME: &'static str;

    fn id(&self) -> i64;

    fn is_new(&self) -> bool {
        self.id() == 0
    }

    /// Refreshes derived fields before the model is validated and written.
    fn prepare(&mut self) {}
}

/// Largest price the schema can hold: 10 integer digits.
const MAX_PRICE_INTEGER_DIGITS: u32 = 10;
const MAX_PRICE_FRACTION_DIGITS: u32 = 2;

pub(crate) fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::new(1, 2) {
        let mut err = ValidationError::new("price_min");
        err.message = Some("Price must be greater than 0".into());
        return Err(err);
    }
    let normalized = price.normalize();
    let integer_limit = Decimal::from(10_i64.pow(MAX_PRICE_INTEGER_DIGITS));
    if normalized.scale() > MAX_PRICE_FRACTION_DIGITS || normalized.trunc() >= integer_limit {
        let mut err = ValidationError::new("price_digits");
        err.message = Some(
            "Price must have at most 10 digits in integer part and 2 digits in fraction part"
                .into(),
        );
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_must_be_at_least_one_cent() {
        assert!(validate_price(&dec!(0.01)).is_ok());
        assert!(validate_price(&dec!(0.00)).is_err());
        assert!(validate_price(&dec!(-5)).is_err());
    }

    #[test]
    fn price_digits_are_bounded() {
        assert!(validate_price(&dec!(9999999999.99)).is_ok());
        assert!(validate_price(&dec!(10000000000.00)).is_err());
        assert!(validate_price(&dec!(1.999)).is_err());
        // trailing zeros do not count as fraction digits
        assert!(validate_price(&dec!(1.5000)).is_ok());
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(validate_not_blank("Bolts").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }
}
