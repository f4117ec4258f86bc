use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::CrudRepository;
use crate::entities::stock_movement::{
    Column, Entity as StockMovement, Model as MovementModel, MovementType,
};
use crate::errors::ServiceError;

/// Repository for the stock movement ledger. Listings are ordered oldest first
/// unless stated otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockMovementRepository {
    base: CrudRepository<StockMovement>,
}

entity_repository!(StockMovementRepository, StockMovement);

impl StockMovementRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_by_product<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        Ok(StockMovement::find()
            .filter(Column::ProductId.eq(product_id))
            .order_by_asc(Column::MovementDate)
            .order_by_asc(Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn find_by_source_location<C: ConnectionTrait>(
        &self,
        conn: &C,
        location_id: i64,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        Ok(StockMovement::find()
            .filter(Column::SourceLocationId.eq(location_id))
            .order_by_asc(Column::MovementDate)
            .order_by_asc(Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn find_by_target_location<C: ConnectionTrait>(
        &self,
        conn: &C,
        location_id: i64,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        Ok(StockMovement::find()
            .filter(Column::TargetLocationId.eq(location_id))
            .order_by_asc(Column::MovementDate)
            .order_by_asc(Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn find_by_type<C: ConnectionTrait>(
        &self,
        conn: &C,
        movement_type: MovementType,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        Ok(StockMovement::find()
            .filter(Column::MovementType.eq(movement_type))
            .order_by_asc(Column::MovementDate)
            .order_by_asc(Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn find_by_reference_number<C: ConnectionTrait>(
        &self,
        conn: &C,
        reference_number: &str,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        Ok(StockMovement::find()
            .filter(Column::ReferenceNumber.eq(reference_number))
            .order_by_asc(Column::Id)
            .all(conn)
            .await?)
    }

    /// Movements dated within `[start, end]`.
    pub async fn find_by_date_between<C: ConnectionTrait>(
        &self,
        conn: &C,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        Ok(StockMovement::find()
            .filter(Column::MovementDate.between(start, end))
            .order_by_asc(Column::MovementDate)
            .order_by_asc(Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn find_by_product_and_date_between<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        Ok(StockMovement::find()
            .filter(Column::ProductId.eq(product_id))
            .filter(Column::MovementDate.between(start, end))
            .order_by_asc(Column::MovementDate)
            .order_by_asc(Column::Id)
            .all(conn)
            .await?)
    }

    /// Sum of quantities moved for `product_id` with the given type; 0 when none.
    pub async fn total_quantity_by_product_and_type<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
        movement_type: MovementType,
    ) -> Result<i64, ServiceError> {
        let total = StockMovement::find()
            .select_only()
            .column_as(Column::Quantity.sum(), "total")
            .filter(Column::ProductId.eq(product_id))
            .filter(Column::MovementType.eq(movement_type))
            .into_tuple::<Option<i64>>()
            .one(conn)
            .await?;
        Ok(total.flatten().unwrap_or(0))
    }

    /// Newest first, at most `limit` rows.
    pub async fn find_most_recent_for_product<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i64,
        limit: u64,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        Ok(StockMovement::find()
            .filter(Column::ProductId.eq(product_id))
            .order_by_desc(Column::MovementDate)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(conn)
            .await?)
    }
}
