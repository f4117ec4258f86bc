use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use super::CrudRepository;
use crate::entities::inventory_item::{Column, Entity as InventoryItem, Model as InventoryModel};
use crate::errors::ServiceError;

/// Repository for stock levels per (product, location).
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryRepository {
    base: CrudRepository<InventoryItem>,
}

entity_repository!(InventoryRepository, InventoryItem);

impl InventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_by_product<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
    ) -> Result<Vec<InventoryModel>, ServiceError> {
        Ok(InventoryItem::find()
            .filter(Column::ProductId.eq(product_id))
            .order_by_asc(Column::LocationId)
            .all(conn)
            .await?)
    }

    pub async fn find_by_location<C: ConnectionTrait>(
        &self,
        conn: &C,
        location_id: i64,
    ) -> Result<Vec<InventoryModel>, ServiceError> {
        Ok(InventoryItem::find()
            .filter(Column::LocationId.eq(location_id))
            .order_by_asc(Column::ProductId)
            .all(conn)
            .await?)
    }

    pub async fn find_by_product_and_location<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
        location_id: i64,
    ) -> Result<Option<InventoryModel>, ServiceError> {
        Ok(InventoryItem::find()
            .filter(Column::ProductId.eq(product_id))
            .filter(Column::LocationId.eq(location_id))
            .one(conn)
            .await?)
    }

    /// Rows with `quantity < threshold`.
    pub async fn find_by_quantity_below<C: ConnectionTrait>(
        &self,
        conn: &C,
        threshold: i32,
    ) -> Result<Vec<InventoryModel>, ServiceError> {
        Ok(InventoryItem::find()
            .filter(Column::Quantity.lt(threshold))
            .all(conn)
            .await?)
    }

    /// Rows with `quantity >= threshold`.
    pub async fn find_by_quantity_at_least<C: ConnectionTrait>(
        &self,
        conn: &C,
        threshold: i32,
    ) -> Result<Vec<InventoryModel>, ServiceError> {
        Ok(InventoryItem::find()
            .filter(Column::Quantity.gte(threshold))
            .all(conn)
            .await?)
    }

    /// Rows at or below their reorder point.
    pub async fn find_items_needing_reorder<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Vec<InventoryModel>, ServiceError> {
        Ok(InventoryItem::find()
            .filter(Expr::col(Column::Quantity).lte(Expr::col(Column::ReorderPoint)))
            .order_by_asc(Column::ProductId)
            .all(conn)
            .await?)
    }

    /// Quantity of `product_id` across all locations; 0 when it is stocked nowhere.
    pub async fn total_quantity_by_product<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
    ) -> Result<i64, ServiceError> {
        let total = InventoryItem::find()
            .select_only()
            .column_as(Column::Quantity.sum(), "total")
            .filter(Column::ProductId.eq(product_id))
            .into_tuple::<Option<i64>>()
            .one(conn)
            .await?;
        Ok(total.flatten().unwrap_or(0))
    }

    /// Rows strictly below their minimum stock level.
    pub async fn find_low_stock<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Vec<InventoryModel>, ServiceError> {
        Ok(InventoryItem::find()
            .filter(Expr::col(Column::Quantity).lt(Expr::col(Column::MinStockLevel)))
            .all(conn)
            .await?)
    }

    /// Rows strictly above their maximum stock level.
    pub async fn find_overstocked<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Vec<InventoryModel>, ServiceError> {
        Ok(InventoryItem::find()
            .filter(Expr::col(Column::Quantity).gt(Expr::col(Column::MaxStockLevel)))
            .all(conn)
            .await?)
    }
}
