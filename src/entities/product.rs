use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{validate_not_blank, validate_price, Persistable};

/// Product entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Product name
    #[validate(
        custom = "validate_not_blank",
        length(max = 100, message = "Product name must be less than 100 characters")
    )]
    pub name: String,

    /// Product description
    #[validate(length(max = 1000, message = "Description must be less than 1000 characters"))]
    pub description: Option<String>,

    /// Unit price, at least 0.01 with two fraction digits at most
    #[validate(custom = "validate_price")]
    pub price: Decimal,

    /// SKU (Stock Keeping Unit)
    #[sea_orm(unique)]
    pub sku: Option<String>,

    pub image_url: Option<String>,

    pub category_id: Option<i64>,

    pub supplier_id: Option<i64>,

    pub created_by: Option<String>,
    pub created_date: DateTime<Utc>,
    pub last_modified_by: Option<String>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl Model {
    pub fn new(name: impl Into<String>, price: Decimal, category_id: Option<i64>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: None,
            price,
            sku: None,
            image_url: None,
            category_id,
            supplier_id: None,
            created_by: None,
            created_date: Utc::now(),
            last_modified_by: None,
            last_modified_date: None,
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_supplier(mut self, supplier_id: i64) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Persistable for Model {
    const NAME: &'static str = "Product";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Product entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id",
        on_delete = "SetNull"
    )]
    Supplier,
    #[sea_orm(has_many = "super::inventory_item::Entity")]
    InventoryItems,
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovements,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryItems.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovements.def()
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
    fn price_below_one_cent_is_rejected() {
        let product = Model::new("Hex bolt M6", dec!(0), None);
        let errors = product.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn builder_sets_optional_fields() {
        let product = Model::new("Hex bolt M6", dec!(0.35), Some(3))
            .with_sku("HB-M6")
            .with_supplier(9)
            .with_description("Zinc plated");
        assert_eq!(product.sku.as_deref(), Some("HB-M6"));
        assert_eq!(product.supplier_id, Some(9));
        assert_eq!(product.category_id, Some(3));
        assert!(product.is_new());
        assert!(product.validate().is_ok());
    }
}
