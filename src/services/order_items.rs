use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;

use super::CrudService;
use crate::db::DbPool;
use crate::entities::order_item::Model as OrderItemModel;
use crate::errors::ServiceError;
use crate::repositories::{OrderItemRepository, ProductQuantity, ProductRevenue};

/// Order line queries and sales statistics.
///
/// Saving a line through this service does not touch its order's totals; use
/// [`crate::services::OrderService::add_item`] for that.
#[derive(Debug, Clone)]
pub struct OrderItemService {
    crud: CrudService<OrderItemRepository>,
}

entity_service!(OrderItemService, OrderItemRepository);

impl OrderItemService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            crud: CrudService::new(db, OrderItemRepository::new()),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_by_order(&self, order_id: i64) -> Result<Vec<OrderItemModel>, ServiceError> {
        read_txn!(self.db(), |txn| self.repository().find_by_order(&txn, order_id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<OrderItemModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_product(&txn, product_id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_order_and_product(
        &self,
        order_id: i64,
        product_id: i64,
    ) -> Result<Vec<OrderItemModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_order_and_product(&txn, order_id, product_id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_quantity_at_least(
        &self,
        quantity: i32,
    ) -> Result<Vec<OrderItemModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_quantity_at_least(&txn, quantity))
    }

    #[instrument(skip(self))]
    pub async fn find_by_unit_price_at_least(
        &self,
        unit_price: Decimal,
    ) -> Result<Vec<OrderItemModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_unit_price_at_least(&txn, unit_price))
    }

    #[instrument(skip(self))]
    pub async fn total_quantity_sold(&self, product_id: i64) -> Result<i64, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .total_quantity_sold(&txn, product_id))
    }

    #[instrument(skip(self))]
    pub async fn total_revenue(&self, product_id: i64) -> Result<Decimal, ServiceError> {
        read_txn!(self.db(), |txn| self.repository().total_revenue(&txn, product_id))
    }

    #[instrument(skip(self))]
    pub async fn top_selling_by_quantity(
        &self,
        limit: u64,
    ) -> Result<Vec<ProductQuantity>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .top_selling_by_quantity(&txn, limit))
    }

    #[instrument(skip(self))]
    pub async fn top_selling_by_revenue(
        &self,
        limit: u64,
    ) -> Result<Vec<ProductRevenue>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .top_selling_by_revenue(&txn, limit))
    }
}
