use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::instrument;

use super::CrudService;
use crate::db::DbPool;
use crate::entities::stock_movement::{Model as MovementModel, MovementType};
use crate::errors::ServiceError;
use crate::repositories::StockMovementRepository;

/// Read access to the stock movement ledger. Movements are normally written by
/// [`crate::services::InventoryService`].
#[derive(Debug, Clone)]
pub struct StockMovementService {
    crud: CrudService<StockMovementRepository>,
}

entity_service!(StockMovementService, StockMovementRepository);

impl StockMovementService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            crud: CrudService::new(db, StockMovementRepository::new()),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_by_product(&self, product_id: i64) -> Result<Vec<MovementModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_product(&txn, product_id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_source_location(
        &self,
        location_id: i64,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_source_location(&txn, location_id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_target_location(
        &self,
        location_id: i64,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_target_location(&txn, location_id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_type(
        &self,
        movement_type: MovementType,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_type(&txn, movement_type))
    }

    #[instrument(skip(self))]
    pub async fn find_by_reference_number(
        &self,
        reference_number: &str,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_reference_number(&txn, reference_number))
    }

    #[instrument(skip(self))]
    pub async fn find_by_date_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_date_between(&txn, start, end))
    }

    #[instrument(skip(self))]
    pub async fn find_by_product_and_date_between(
        &self,
        product_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_product_and_date_between(&txn, product_id, start, end))
    }

    #[instrument(skip(self))]
    pub async fn total_quantity_by_product_and_type(
        &self,
        product_id: i64,
        movement_type: MovementType,
    ) -> Result<i64, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .total_quantity_by_product_and_type(&txn, product_id, movement_type))
    }

    #[instrument(skip(self))]
    pub async fn find_most_recent_for_product(
        &self,
        product_id: i64,
        limit: u64,
    ) -> Result<Vec<MovementModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_most_recent_for_product(&txn, product_id, limit))
    }
}
