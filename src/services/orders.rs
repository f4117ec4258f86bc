use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use std::sync::Arc;
use tracing::{info, instrument};

use super::CrudService;
use crate::db::DbPool;
use crate::entities::order::{Model as OrderModel, OrderStatus, OrderWithItems};
use crate::entities::order_item::Model as OrderItemModel;
use crate::entities::Persistable;
use crate::errors::ServiceError;
use crate::repositories::{OrderItemRepository, OrderRepository};

/// Service for orders and their lines.
///
/// Every operation that changes an order's lines stores the recalculated
/// totals in the same transaction.
#[derive(Debug, Clone)]
pub struct OrderService {
    crud: CrudService<OrderRepository>,
    items: OrderItemRepository,
}

entity_service!(OrderService, OrderRepository);

impl OrderService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            crud: CrudService::new(db, OrderRepository::new()),
            items: OrderItemRepository::new(),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_by_order_number(
        &self,
        order_number: &str,
    ) -> Result<Option<OrderModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_order_number(&txn, order_number))
    }

    #[instrument(skip(self))]
    pub async fn find_by_customer_name_containing(
        &self,
        name: &str,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_customer_name_containing(&txn, name))
    }

    #[instrument(skip(self))]
    pub async fn find_by_customer_email(&self, email: &str) -> Result<Vec<OrderModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_customer_email(&txn, email))
    }

    #[instrument(skip(self))]
    pub async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<OrderModel>, ServiceError> {
        read_txn!(self.db(), |txn| self.repository().find_by_status(&txn, status))
    }

    #[instrument(skip(self))]
    pub async fn find_by_date_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_date_between(&txn, start, end))
    }

    #[instrument(skip(self))]
    pub async fn find_by_total_at_least(
        &self,
        total: Decimal,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_total_at_least(&txn, total))
    }

    #[instrument(skip(self))]
    pub async fn find_by_total_at_most(
        &self,
        total: Decimal,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_total_at_most(&txn, total))
    }

    #[instrument(skip(self))]
    pub async fn find_by_status_and_date_between(
        &self,
        status: OrderStatus,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_by_status_and_date_between(&txn, status, start, end))
    }

    #[instrument(skip(self))]
    pub async fn find_orders_containing_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .find_orders_containing_product(&txn, product_id))
    }

    #[instrument(skip(self))]
    pub async fn total_sales_for_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Decimal, ServiceError> {
        read_txn!(self.db(), |txn| self
            .repository()
            .total_sales_for_date_range(&txn, start, end))
    }

    #[instrument(skip(self))]
    pub async fn count_by_status(&self, status: OrderStatus) -> Result<u64, ServiceError> {
        read_txn!(self.db(), |txn| self.repository().count_by_status(&txn, status))
    }

    #[instrument(skip(self))]
    pub async fn find_with_items(
        &self,
        order_id: i64,
    ) -> Result<Option<OrderWithItems>, ServiceError> {
        read_txn!(self.db(), |txn| self.repository().find_with_items(&txn, order_id))
    }

    /// Stores a new order together with its lines. Line subtotals and order
    /// totals are computed before anything is written.
    #[instrument(skip(self, order, items), fields(order_number = %order.order_number, items = items.len()))]
    pub async fn place_order(
        &self,
        order: OrderModel,
        items: Vec<OrderItemModel>,
    ) -> Result<OrderWithItems, ServiceError> {
        if !order.is_new() {
            return Err(ServiceError::InvalidInput(format!(
                "Order {} has already been placed",
                order.id
            )));
        }
        if let Some(item) = items.iter().find(|item| !item.is_new()) {
            return Err(ServiceError::InvalidInput(format!(
                "Order item {} already belongs to an order",
                item.id
            )));
        }
        let placed = write_txn!(self.db(), |txn| self.place_in(&txn, order, items))?;
        counter!("warehouse_orders.placed", 1);
        info!(
            order_id = placed.order.id,
            total = %placed.order.total,
            "Order placed"
        );
        Ok(placed)
    }

    /// Attaches a new line to an existing order and stores the new totals.
    #[instrument(skip(self, item))]
    pub async fn add_item(
        &self,
        order_id: i64,
        item: OrderItemModel,
    ) -> Result<OrderWithItems, ServiceError> {
        if !item.is_new() {
            return Err(ServiceError::InvalidInput(format!(
                "Order item {} already belongs to an order",
                item.id
            )));
        }
        let order = write_txn!(self.db(), |txn| self.add_item_in(&txn, order_id, item))?;
        info!(order_id, total = %order.order.total, "Order item added");
        Ok(order)
    }

    /// Deletes line `item_id` from the order and stores the new totals.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        order_id: i64,
        item_id: i64,
    ) -> Result<OrderWithItems, ServiceError> {
        let order = write_txn!(self.db(), |txn| self.remove_item_in(&txn, order_id, item_id))?;
        info!(order_id, item_id, total = %order.order.total, "Order item removed");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<OrderModel, ServiceError> {
        let (old_status, order) =
            write_txn!(self.db(), |txn| self.update_status_in(&txn, order_id, status))?;
        info!(
            order_id,
            old_status = %old_status,
            new_status = %order.status,
            "Order status updated"
        );
        Ok(order)
    }

    /// Cancels the order, appending `reason` to its notes.
    #[instrument(skip(self))]
    pub async fn cancel_order(
        &self,
        order_id: i64,
        reason: Option<String>,
    ) -> Result<OrderModel, ServiceError> {
        let order = write_txn!(self.db(), |txn| self.cancel_in(&txn, order_id, reason))?;
        counter!("warehouse_orders.cancelled", 1);
        info!(order_id, "Order cancelled");
        Ok(order)
    }

    /// Recomputes the stored totals from the order's current lines.
    #[instrument(skip(self))]
    pub async fn recalculate_totals(&self, order_id: i64) -> Result<OrderModel, ServiceError> {
        write_txn!(self.db(), |txn| self.recalculate_in(&txn, order_id))
    }

    async fn place_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        mut order: OrderModel,
        mut items: Vec<OrderItemModel>,
    ) -> Result<OrderWithItems, ServiceError> {
        for item in &mut items {
            item.calculate_subtotal();
        }
        order.calculate_totals(&items);
        let order = self.repository().save(conn, order).await?;

        let mut placed = OrderWithItems::new(order);
        for mut item in items {
            item.order_id = placed.order.id;
            placed.items.push(self.items.save(conn, item).await?);
        }
        placed.calculate_totals();
        Ok(placed)
    }

    async fn add_item_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: i64,
        mut item: OrderItemModel,
    ) -> Result<OrderWithItems, ServiceError> {
        let mut order = self.load(conn, order_id).await?;
        item.order_id = order_id;
        let item = self.items.save(conn, item).await?;
        order.add_item(item);
        self.store_totals(conn, order).await
    }

    async fn remove_item_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: i64,
        item_id: i64,
    ) -> Result<OrderWithItems, ServiceError> {
        let mut order = self.load(conn, order_id).await?;
        let index = order
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "OrderItem with ID {} not found in order {}",
                    item_id, order_id
                ))
            })?;
        self.items.delete_by_id(conn, item_id).await?;
        order.remove_item(index);
        self.store_totals(conn, order).await
    }

    async fn update_status_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<(OrderStatus, OrderModel), ServiceError> {
        let mut order = self.repository().get_by_id(conn, order_id).await?;
        let old_status = order.status;
        order.status = status;
        let order = self.repository().save(conn, order).await?;
        Ok((old_status, order))
    }

    async fn cancel_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: i64,
        reason: Option<String>,
    ) -> Result<OrderModel, ServiceError> {
        let mut order = self.repository().get_by_id(conn, order_id).await?;
        order.status = OrderStatus::Cancelled;
        if let Some(reason) = reason {
            order.notes = Some(match order.notes.take() {
                Some(notes) if !notes.is_empty() => format!("{}\nCancelled: {}", notes, reason),
                _ => format!("Cancelled: {}", reason),
            });
        }
        self.repository().save(conn, order).await
    }

    async fn recalculate_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: i64,
    ) -> Result<OrderModel, ServiceError> {
        let order = self.load(conn, order_id).await?;
        Ok(self.store_totals(conn, order).await?.order)
    }

    async fn load<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: i64,
    ) -> Result<OrderWithItems, ServiceError> {
        self.repository()
            .find_with_items(conn, order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(OrderModel::NAME, order_id))
    }

    async fn store_totals<C: ConnectionTrait>(
        &self,
        conn: &C,
        mut order: OrderWithItems,
    ) -> Result<OrderWithItems, ServiceError> {
        order.calculate_totals();
        order.order = self.repository().save(conn, order.order).await?;
        Ok(order)
    }
}
