use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::{order_item, validate_not_blank, Persistable};

/// Lifecycle status of an order. Stored as the upper-case identifier.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum OrderStatus {
    #[default]
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PROCESSING")]
    Processing,
    #[sea_orm(string_value = "SHIPPED")]
    Shipped,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
    #[sea_orm(string_value = "RETURNED")]
    Returned,
}

impl OrderStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Returned => "Returned",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order has been created but not yet processed",
            OrderStatus::Processing => "Order is being processed",
            OrderStatus::Shipped => "Order has been shipped",
            OrderStatus::Delivered => "Order has been delivered",
            OrderStatus::Cancelled => "Order has been cancelled",
            OrderStatus::Returned => "Order has been returned",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The `orders` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    #[validate(custom = "validate_not_blank")]
    pub order_number: String,

    pub order_date: DateTime<Utc>,

    #[validate(
        custom = "validate_not_blank",
        length(max = 100, message = "Customer name must be less than 100 characters")
    )]
    pub customer_name: String,

    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,

    #[validate(length(max = 255, message = "Shipping address must be less than 255 characters"))]
    pub shipping_address: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_country: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub shipping_method: Option<String>,
    pub payment_method: Option<String>,

    pub subtotal: Decimal,
    pub tax: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    pub total: Decimal,

    pub status: OrderStatus,
    pub notes: Option<String>,

    pub created_by: Option<String>,
    pub created_date: DateTime<Utc>,
    pub last_modified_by: Option<String>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl Model {
    pub fn new(order_number: impl Into<String>, customer_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            order_number: order_number.into(),
            order_date: now,
            customer_name: customer_name.into(),
            customer_email: None,
            customer_phone: None,
            shipping_address: None,
            shipping_city: None,
            shipping_country: None,
            shipping_postal_code: None,
            shipping_method: None,
            payment_method: None,
            subtotal: Decimal::ZERO,
            tax: Some(Decimal::ZERO),
            shipping_cost: Some(Decimal::ZERO),
            total: Decimal::ZERO,
            status: OrderStatus::Pending,
            notes: None,
            created_by: None,
            created_date: now,
            last_modified_by: None,
            last_modified_date: None,
        }
    }

    /// subtotal = Σ item subtotals; total = subtotal + tax + shipping. Missing
    /// tax or shipping counts as zero.
    pub fn calculate_totals(&mut self, items: &[order_item::Model]) {
        self.subtotal = items.iter().map(|item| item.subtotal).sum();
        self.total = self.subtotal
            + self.tax.unwrap_or(Decimal::ZERO)
            + self.shipping_cost.unwrap_or(Decimal::ZERO);
    }
}

impl Persistable for Model {
    const NAME: &'static str = "Order";

    fn id(&self) -> i64 {
        self.id
    }
}

/// An order together with its lines, kept in insertion order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderWithItems {
    pub order: Model,
    pub items: Vec<order_item::Model>,
}

impl OrderWithItems {
    pub fn new(order: Model) -> Self {
        Self::from_parts(order, Vec::new())
    }

    pub fn from_parts(order: Model, items: Vec<order_item::Model>) -> Self {
        let mut aggregate = Self { order, items };
        aggregate.calculate_totals();
        aggregate
    }

    pub fn add_item(&mut self, mut item: order_item::Model) {
        item.order_id = self.order.id;
        self.items.push(item);
        self.calculate_totals();
    }

    /// Detaches the line at `index`; `None` when out of range. Totals are
    /// recalculated either way.
    pub fn remove_item(&mut self, index: usize) -> Option<order_item::Model> {
        let removed = (index < self.items.len()).then(|| {
            let mut item = self.items.remove(index);
            item.order_id = 0;
            item
        });
        self.calculate_totals();
        removed
    }

    pub fn calculate_totals(&mut self) {
        self.order.calculate_totals(&self.items);
    }

    pub fn total(&self) -> Decimal {
        self.order.total
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
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
    use std::str::FromStr;

    fn line(subtotal: Decimal) -> order_item::Model {
        let mut item = order_item::Model::new(1, 1, subtotal);
        item.subtotal = subtotal;
        item
    }

    #[test]
    fn totals_include_tax_and_shipping() {
        let mut order = Model::new("SO-1", "Dana");
        order.tax = Some(dec!(1.00));
        order.shipping_cost = Some(dec!(2.00));
        order.calculate_totals(&[line(dec!(10.00)), line(dec!(5.50))]);
        assert_eq!(order.subtotal, dec!(15.50));
        assert_eq!(order.total, dec!(18.50));
    }

    #[test]
    fn missing_tax_and_shipping_count_as_zero() {
        let mut order = Model::new("SO-2", "Dana");
        order.tax = None;
        order.shipping_cost = None;
        order.calculate_totals(&[line(dec!(4.25))]);
        assert_eq!(order.total, dec!(4.25));
    }

    #[test]
    fn add_and_remove_keep_total_consistent() {
        let mut order = Model::new("SO-3", "Dana");
        order.id = 12;
        order.shipping_cost = Some(dec!(3.00));
        let mut aggregate = OrderWithItems::new(order);

        aggregate.add_item(order_item::Model::new(7, 2, dec!(4.00)));
        aggregate.add_item(order_item::Model::new(8, 1, dec!(1.50)));
        assert_eq!(aggregate.items[0].order_id, 12);
        assert_eq!(aggregate.total(), dec!(12.50));

        let removed = aggregate.remove_item(0).unwrap();
        assert_eq!(removed.order_id, 0);
        assert_eq!(aggregate.order.subtotal, dec!(1.50));
        assert_eq!(aggregate.total(), dec!(4.50));

        assert!(aggregate.remove_item(5).is_none());
        assert_eq!(aggregate.total(), dec!(4.50));
    }

    #[test]
    fn empty_aggregate_totals_tax_and_shipping() {
        let mut order = Model::new("SO-5", "Dana");
        order.tax = Some(dec!(1.00));
        order.shipping_cost = Some(dec!(2.00));

        let mut aggregate = OrderWithItems::new(order);
        assert_eq!(aggregate.total(), dec!(3.00));

        aggregate.order.tax = Some(dec!(4.00));
        assert!(aggregate.remove_item(0).is_none());
        assert_eq!(aggregate.total(), dec!(6.00));
    }

    #[test]
    fn status_renders_display_name_and_parses_identifier() {
        assert_eq!(OrderStatus::Cancelled.to_string(), "Cancelled");
        assert_eq!(OrderStatus::Shipped.to_value(), "SHIPPED");
        assert_eq!(OrderStatus::from_str("returned").unwrap(), OrderStatus::Returned);
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(
            OrderStatus::Pending.description(),
            "Order has been created but not yet processed"
        );
    }

    #[test]
    fn blank_order_number_fails_validation() {
        assert!(Model::new(" ", "Dana").validate().is_err());
        assert!(Model::new("SO-4", "").validate().is_err());
    }
}
