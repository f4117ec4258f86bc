use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{validate_price, Persistable};

/// One line of an order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom = "validate_price")]
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_date: DateTime<Utc>,
    pub last_modified_by: Option<String>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl Model {
    /// Builds an unsaved line for `product_id`. `order_id` is filled in when
    /// the line is attached to an order.
    pub fn new(product_id: i64, quantity: i32, unit_price: Decimal) -> Self {
        let mut item = Self {
            id: 0,
            order_id: 0,
            product_id,
            quantity,
            unit_price,
            subtotal: Decimal::ZERO,
            notes: None,
            created_by: None,
            created_date: Utc::now(),
            last_modified_by: None,
            last_modified_date: None,
        };
        item.calculate_subtotal();
        item
    }

    pub fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity;
        self.calculate_subtotal();
    }

    pub fn set_unit_price(&mut self, unit_price: Decimal) {
        self.unit_price = unit_price;
        self.calculate_subtotal();
    }

    /// subtotal = unit_price × quantity when both are positive, zero otherwise.
    pub fn calculate_subtotal(&mut self) -> Decimal {
        self.subtotal = if self.quantity > 0 && self.unit_price > Decimal::ZERO {
            self.unit_price * Decimal::from(self.quantity)
        } else {
            Decimal::ZERO
        };
        self.subtotal
    }
}

impl Persistable for Model {
    const NAME: &'static str = "OrderItem";

    fn id(&self) -> i64 {
        self.id
    }

    fn prepare(&mut self) {
        self.calculate_subtotal();
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
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
    use rust_decimal_macros::dec;

    #[test]
    fn subtotal_is_price_times_quantity() {
        let mut item = Model::new(1, 3, dec!(9.99));
        assert_eq!(item.calculate_subtotal(), dec!(29.97));
        assert_eq!(item.subtotal, dec!(29.97));
    }

    #[test]
    fn zero_quantity_gives_zero_subtotal() {
        let mut item = Model::new(1, 0, dec!(123.45));
        assert_eq!(item.calculate_subtotal(), Decimal::ZERO);
    }

    #[test]
    fn non_positive_price_gives_zero_subtotal() {
        let item = Model::new(1, 4, dec!(-2.00));
        assert_eq!(item.subtotal, Decimal::ZERO);
    }

    #[test]
    fn setters_keep_subtotal_current() {
        let mut item = Model::new(1, 1, dec!(2.50));
        item.set_quantity(4);
        assert_eq!(item.subtotal, dec!(10.00));
        item.set_unit_price(dec!(1.25));
        assert_eq!(item.subtotal, dec!(5.00));
    }

    #[test]
    fn prepare_repairs_stale_subtotal() {
        let mut item = Model::new(1, 2, dec!(3.00));
        item.subtotal = dec!(999);
        item.prepare();
        assert_eq!(item.subtotal, dec!(6.00));
    }

    #[test]
    fn line_validation() {
        assert!(Model::new(1, 0, dec!(1.00)).validate().is_err());
        assert!(Model::new(1, 1, dec!(0.00)).validate().is_err());
        assert!(Model::new(1, 1, dec!(0.01)).validate().is_ok());
    }
}
