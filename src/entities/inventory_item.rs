use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Persistable;
use crate::errors::ServiceError;

/// Stock of one product held at one location. Unique on (product_id, location_id).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub product_id: i64,

    pub location_id: i64,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,

    #[validate(range(min = 0, message = "Minimum stock level cannot be negative"))]
    pub min_stock_level: i32,

    #[validate(range(min = 0, message = "Maximum stock level cannot be negative"))]
    pub max_stock_level: i32,

    pub reorder_point: i32,

    pub created_by: Option<String>,
    pub created_date: DateTime<Utc>,
    pub last_modified_by: Option<String>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl Model {
    pub fn new(product_id: i64, location_id: i64, quantity: i32) -> Self {
        Self {
            id: 0,
            product_id,
            location_id,
            quantity,
            min_stock_level: 0,
            max_stock_level: 0,
            reorder_point: 0,
            created_by: None,
            created_date: Utc::now(),
            last_modified_by: None,
            last_modified_date: None,
        }
    }

    pub fn with_levels(mut self, min_stock_level: i32, max_stock_level: i32, reorder_point: i32) -> Self {
        self.min_stock_level = min_stock_level;
        self.max_stock_level = max_stock_level;
        self.reorder_point = reorder_point;
        self
    }

    /// Adds stock and returns the new quantity.
    pub fn add_quantity(&mut self, quantity_to_add: i32) -> Result<i32, ServiceError> {
        if quantity_to_add < 0 {
            return Err(ServiceError::InvalidArgument(
                "Quantity to add cannot be negative".to_string(),
            ));
        }
        self.quantity = self.quantity.checked_add(quantity_to_add).ok_or_else(|| {
            ServiceError::InvalidArgument(format!(
                "Adding {} to {} overflows the quantity column",
                quantity_to_add, self.quantity
            ))
        })?;
        Ok(self.quantity)
    }

    /// Removes stock and returns the new quantity. Quantity never drops below zero.
    pub fn remove_quantity(&mut self, quantity_to_remove: i32) -> Result<i32, ServiceError> {
        if quantity_to_remove < 0 {
            return Err(ServiceError::InvalidArgument(
                "Quantity to remove cannot be negative".to_string(),
            ));
        }
        if quantity_to_remove > self.quantity {
            return Err(ServiceError::InsufficientStock(format!(
                "Not enough quantity available: requested {}, on hand {}",
                quantity_to_remove, self.quantity
            )));
        }
        self.quantity -= quantity_to_remove;
        Ok(self.quantity)
    }

    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_point
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.min_stock_level
    }

    pub fn is_overstocked(&self) -> bool {
        self.quantity > self.max_stock_level
    }
}

impl Persistable for Model {
    const NAME: &'static str = "InventoryItem";

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

crate::impl_audit_stamp!();

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self.stamp_audit(insert);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    #[test]
    fn add_then_remove_round_trips() {
        let mut item = Model::new(1, 1, 10);
        assert_eq!(item.add_quantity(5).unwrap(), 15);
        assert_eq!(item.remove_quantity(15).unwrap(), 0);
        assert_eq!(item.quantity, 0);
    }

    #[test]
    fn negative_adjustments_are_rejected_without_side_effects() {
        let mut item = Model::new(1, 1, 10);
        assert_matches!(item.add_quantity(-1), Err(ServiceError::InvalidArgument(_)));
        assert_matches!(item.remove_quantity(-1), Err(ServiceError::InvalidArgument(_)));
        assert_eq!(item.quantity, 10);
    }

    #[test]
    fn removing_more_than_on_hand_fails() {
        let mut item = Model::new(1, 1, 3);
        assert_matches!(item.remove_quantity(4), Err(ServiceError::InsufficientStock(_)));
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn overflow_is_reported() {
        let mut item = Model::new(1, 1, i32::MAX);
        assert!(item.add_quantity(1).is_err());
        assert_eq!(item.quantity, i32::MAX);
    }

    #[rstest]
    #[case(5, 5, true)]
    #[case(4, 5, true)]
    #[case(6, 5, false)]
    #[case(0, 0, true)]
    #[case(0, -1, false)]
    fn reorder_threshold_is_inclusive(
        #[case] quantity: i32,
        #[case] reorder_point: i32,
        #[case] expected: bool,
    ) {
        let item = Model::new(1, 1, quantity).with_levels(0, 100, reorder_point);
        assert_eq!(item.needs_reorder(), expected);
    }

    #[test]
    fn stock_level_bands() {
        let low = Model::new(1, 1, 2).with_levels(5, 50, 5);
        assert!(low.is_low_stock());
        assert!(!low.is_overstocked());

        let high = Model::new(1, 1, 60).with_levels(5, 50, 5);
        assert!(high.is_overstocked());
        assert!(!high.is_low_stock());
    }

    #[test]
    fn negative_quantity_fails_validation() {
        let item = Model::new(1, 1, -1);
        assert!(item.validate().is_err());
    }
}
