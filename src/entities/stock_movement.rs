use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Persistable;

/// Classification of a stock change.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MovementType {
    /// Stock received
    #[sea_orm(string_value = "STOCK_IN")]
    StockIn,
    /// Stock shipped to a customer
    #[sea_orm(string_value = "STOCK_OUT")]
    StockOut,
    /// Stock corrected after a count or damage
    #[sea_orm(string_value = "ADJUSTMENT")]
    Adjustment,
    /// Stock moved between locations
    #[sea_orm(string_value = "TRANSFER")]
    Transfer,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: i64,
    pub source_location_id: Option<i64>,
    pub target_location_id: Option<i64>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub movement_type: MovementType,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub movement_date: DateTime<Utc>,
    pub created_by: Option<String>,
    pub created_date: DateTime<Utc>,
    pub last_modified_by: Option<String>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl Model {
    pub fn new(
        product_id: i64,
        source_location_id: Option<i64>,
        target_location_id: Option<i64>,
        quantity: i32,
        movement_type: MovementType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            product_id,
            source_location_id,
            target_location_id,
            quantity,
            movement_type,
            reference_number: None,
            notes: None,
            movement_date: now,
            created_by: None,
            created_date: now,
            last_modified_by: None,
            last_modified_date: None,
        }
    }

    pub fn with_reference(mut self, reference_number: Option<String>) -> Self {
        self.reference_number = reference_number;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }
}

impl Persistable for Model {
    const NAME: &'static str = "StockMovement";

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
        from = "Column::SourceLocationId",
        to = "super::location::Column::Id"
    )]
    SourceLocation,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::TargetLocationId",
        to = "super::location::Column::Id"
    )]
    TargetLocation,
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
